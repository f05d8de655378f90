use folio_common::Rect;
use folio_widgets::Rotation;
use glam::{Mat4, Vec2, Vec3};

/// Keeps points behind the viewer from flipping through the projection.
const MIN_W: f32 = 0.05;

/// Screen-space corners of a tilted card, clockwise from top-left.
///
/// Matches `perspective(p) rotateX(x) rotateY(y)` applied around the card
/// center, with the card face pushed `depth` px toward the viewer. Screen
/// axes are y-down and z points out of the screen.
pub fn project_card(rect: Rect, rotation: Rotation, depth: f32, perspective: f32) -> [Vec2; 4] {
    let m = Mat4::from_rotation_x(rotation.x.to_radians())
        * Mat4::from_rotation_y(rotation.y.to_radians());
    let center = rect.center();
    let half = rect.size * 0.5;
    let local = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ];
    local.map(|p| {
        let q = m.transform_point3(Vec3::new(p.x, p.y, depth));
        let w = if perspective > 0.0 {
            (1.0 - q.z / perspective).max(MIN_W)
        } else {
            1.0
        };
        center + Vec2::new(q.x, q.y) / w
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn flat_card_projects_onto_itself() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        let corners = project_card(rect, Rotation::default(), 0.0, 1000.0);
        assert!(approx(corners[0], Vec2::new(100.0, 50.0)));
        assert!(approx(corners[2], Vec2::new(300.0, 150.0)));
    }

    #[test]
    fn depth_enlarges_around_center() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let corners = project_card(rect, Rotation::default(), 20.0, 1000.0);
        let scale = 1.0 / (1.0 - 20.0 / 1000.0);
        let expected = rect.center() + Vec2::new(-100.0, -50.0) * scale;
        assert!(approx(corners[0], expected));
    }

    #[test]
    fn positive_rotate_x_tips_top_edge_away() {
        let rect = Rect::new(0.0, 0.0, 400.0, 300.0);
        let rotation = Rotation { x: 10.0, y: 0.0 };
        let [tl, tr, br, bl] = project_card(rect, rotation, 0.0, 1000.0);
        let top = tr.x - tl.x;
        let bottom = br.x - bl.x;
        assert!(top < bottom, "top {top} should be narrower than bottom {bottom}");
    }

    #[test]
    fn positive_rotate_y_tips_right_edge_away() {
        let rect = Rect::new(0.0, 0.0, 400.0, 300.0);
        let rotation = Rotation { x: 0.0, y: 10.0 };
        let [tl, tr, br, bl] = project_card(rect, rotation, 0.0, 1000.0);
        assert!(br.y - tr.y < bl.y - tl.y);
    }

    #[test]
    fn zero_perspective_is_orthographic() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let corners = project_card(rect, Rotation::default(), 50.0, 0.0);
        assert!(approx(corners[0], Vec2::new(0.0, 0.0)));
    }
}
