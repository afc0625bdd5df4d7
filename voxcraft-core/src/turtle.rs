/// Turtle graphics: heading and step commands drawn as lines of boxes
use crate::geometry::Rgba;
use crate::quantize::round_to;
use crate::scene::SceneState;

/// A pen moving through the scene.
///
/// The heading is kept in polar form: `theta` is measured from +y (90 means
/// horizontal) and `phi` turns around the y axis, starting towards +z.
pub struct Turtle<'a> {
    scene: &'a mut SceneState,
    position: [f64; 3],
    polar_theta: f64,
    polar_phi: f64,
    drawable: bool,
    color: Rgba,
}

impl<'a> Turtle<'a> {
    pub fn new(scene: &'a mut SceneState) -> Self {
        Self {
            scene,
            position: [0.0; 3],
            polar_theta: 90.0,
            polar_phi: 0.0,
            drawable: true,
            color: Rgba::BLACK,
        }
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    pub fn forward(&mut self, length: f64) {
        let theta = self.polar_theta.to_radians();
        let phi = self.polar_phi.to_radians();
        let [x, y, z] = self.position;

        let next = [
            round_to(x + length * theta.sin() * phi.sin(), 3),
            round_to(y + length * theta.cos(), 3),
            round_to(z + length * theta.sin() * phi.cos(), 3),
        ];

        if self.drawable {
            let c = self.color;
            self.scene.draw_line(self.position, next, Rgba::rgb(c.r, c.g, c.b));
        }
        self.position = next;
    }

    pub fn backward(&mut self, length: f64) {
        self.forward(-length);
    }

    pub fn up(&mut self, degrees: f64) {
        self.polar_theta -= degrees;
    }

    pub fn down(&mut self, degrees: f64) {
        self.polar_theta += degrees;
    }

    pub fn right(&mut self, degrees: f64) {
        self.polar_phi -= degrees;
    }

    pub fn left(&mut self, degrees: f64) {
        self.polar_phi += degrees;
    }

    /// Pen color; lines are always drawn opaque
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn pen_down(&mut self) {
        self.drawable = true;
    }

    pub fn pen_up(&mut self) {
        self.drawable = false;
    }

    pub fn set_pos(&mut self, x: f64, y: f64, z: f64) {
        self.position = [x, y, z];
    }

    pub fn reset(&mut self) {
        self.position = [0.0; 3];
        self.polar_theta = 90.0;
        self.polar_phi = 0.0;
        self.drawable = true;
        self.color = Rgba::BLACK;
    }
}
