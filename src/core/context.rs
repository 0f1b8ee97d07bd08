//! The rasterizer: clip, divide, viewport, scan, depth test, and
//! fragment dispatch.

use super::{Framebuffer, RenderError};
use crate::geometry::{Line, Mesh, Triangle, Vertex};
use crate::math::{Color, Matrix4, Vector4};
use crate::shader::{Shader, SolidColorShader};

/// Near-zero screen-space area below which a triangle is dropped.
const DEGENERATE_AREA: f64 = 1e-9;

/// Signed distance of a clip-space position to one of the six canonical
/// planes; non-negative means inside.
fn clip_distance(plane: usize, o: &Vector4) -> f64 {
    match plane {
        0 => o.w + o.x,
        1 => o.w - o.x,
        2 => o.w + o.y,
        3 => o.w - o.y,
        4 => o.w + o.z,
        _ => o.w - o.z,
    }
}

/// Sutherland-Hodgman clip of a convex polygon against the canonical
/// volume, in homogeneous space. Attributes are lerped along clipped
/// edges at the parameter that lands on the plane.
fn clip_polygon(input: &[Vertex]) -> Vec<Vertex> {
    let mut poly = input.to_vec();
    for plane in 0..6 {
        if poly.is_empty() {
            break;
        }
        let mut out = Vec::with_capacity(poly.len() + 1);
        for i in 0..poly.len() {
            let a = poly[i];
            let b = poly[(i + 1) % poly.len()];
            let da = clip_distance(plane, &a.output);
            let db = clip_distance(plane, &b.output);
            if da >= 0.0 {
                out.push(a);
            }
            if (da >= 0.0) != (db >= 0.0) {
                let t = da / (da - db);
                out.push(a.lerp(&b, t));
            }
        }
        poly = out;
    }
    poly
}

/// The per-render rasterization state: a framebuffer, the active shader,
/// and the screen transform.
///
/// Rasterization never fails; degenerate inputs (zero-area triangles,
/// NaN shader outputs) are skipped silently. Triangles are processed in
/// submission order, so output is deterministic.
pub struct RenderContext {
    framebuffer: Framebuffer,
    /// The active shader; replaced per draw by scene renderers.
    pub shader: Box<dyn Shader>,
    screen_matrix: Matrix4,
}

impl RenderContext {
    /// Create a context with the given framebuffer dimensions and a white
    /// solid-color shader.
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        Ok(Self {
            framebuffer: Framebuffer::new(width, height)?,
            shader: Box::new(SolidColorShader::new(Matrix4::IDENTITY, Color::WHITE)),
            screen_matrix: Matrix4::screen(width, height),
        })
    }

    /// Framebuffer width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.framebuffer.width()
    }

    /// Framebuffer height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.framebuffer.height()
    }

    /// The rendered image.
    pub fn image(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Mutable framebuffer access, e.g. to toggle the write gates.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Fill the color plane.
    pub fn clear_color(&mut self, color: Color) {
        self.framebuffer.clear_color(color);
    }

    /// Fill the depth plane; [`RenderContext::clear_depth_default`] resets
    /// to the maximum finite value.
    pub fn clear_depth(&mut self, depth: f64) {
        self.framebuffer.clear_depth(depth);
    }

    /// Reset the depth plane to the maximum finite value.
    pub fn clear_depth_default(&mut self) {
        self.framebuffer.clear_depth(f64::MAX);
    }

    /// Rasterize every triangle and line of a mesh with the active
    /// shader. An empty mesh is a no-op.
    pub fn draw_mesh(&mut self, mesh: &Mesh) {
        for triangle in &mesh.triangles {
            self.draw_triangle(triangle);
        }
        for line in &mesh.lines {
            self.draw_line(line);
        }
    }

    /// Rasterize a single triangle: vertex stage, trivial rejection,
    /// clipping with fan re-triangulation, then scan conversion.
    pub fn draw_triangle(&mut self, triangle: &Triangle) {
        let v1 = self.shader.vertex(&triangle.v1);
        let v2 = self.shader.vertex(&triangle.v2);
        let v3 = self.shader.vertex(&triangle.v3);

        if v1.output.is_degenerate() || v2.output.is_degenerate() || v3.output.is_degenerate() {
            return;
        }

        // All three vertices beyond one plane: nothing visible.
        for plane in 0..6 {
            if clip_distance(plane, &v1.output) < 0.0
                && clip_distance(plane, &v2.output) < 0.0
                && clip_distance(plane, &v3.output) < 0.0
            {
                return;
            }
        }

        let inside = !v1.output.outside_clip_volume()
            && !v2.output.outside_clip_volume()
            && !v3.output.outside_clip_volume();
        if inside {
            self.fill_triangle(&v1, &v2, &v3);
            return;
        }

        // Clip to a convex polygon of 3-7 vertices and re-triangulate as
        // a fan.
        let poly = clip_polygon(&[v1, v2, v3]);
        if poly.len() < 3 {
            return;
        }
        for i in 1..poly.len() - 1 {
            self.fill_triangle(&poly[0], &poly[i], &poly[i + 1]);
        }
    }

    /// Scan-convert a triangle already inside the clip volume.
    fn fill_triangle(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        let w1 = v1.output.w;
        let w2 = v2.output.w;
        let w3 = v3.output.w;
        if w1 == 0.0 || w2 == 0.0 || w3 == 0.0 {
            return;
        }

        let s1 = self.screen_matrix.mul_position(&v1.output.perspective_divide());
        let s2 = self.screen_matrix.mul_position(&v2.output.perspective_divide());
        let s3 = self.screen_matrix.mul_position(&v3.output.perspective_divide());
        if s1.is_degenerate() || s2.is_degenerate() || s3.is_degenerate() {
            return;
        }

        // Twice the signed screen area; also the barycentric denominator.
        let det = (s2.y - s3.y) * (s1.x - s3.x) + (s3.x - s2.x) * (s1.y - s3.y);
        if det.abs() < DEGENERATE_AREA {
            return;
        }

        let width = self.framebuffer.width() as i64;
        let height = self.framebuffer.height() as i64;
        let min_x = (s1.x.min(s2.x).min(s3.x).floor() as i64).max(0);
        let max_x = (s1.x.max(s2.x).max(s3.x).ceil() as i64).min(width - 1);
        let min_y = (s1.y.min(s2.y).min(s3.y).floor() as i64).max(0);
        let max_y = (s1.y.max(s2.y).max(s3.y).ceil() as i64).min(height - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                let b1 = ((s2.y - s3.y) * (px - s3.x) + (s3.x - s2.x) * (py - s3.y)) / det;
                let b2 = ((s3.y - s1.y) * (px - s3.x) + (s1.x - s3.x) * (py - s3.y)) / det;
                let b3 = 1.0 - b1 - b2;
                if b1 < 0.0 || b2 < 0.0 || b3 < 0.0 {
                    continue;
                }

                // Depth interpolates linearly in screen space.
                let z = b1 * s1.z + b2 * s2.z + b3 * s3.z;
                let (ux, uy) = (x as usize, y as usize);
                if self.framebuffer.write_depth && z > self.framebuffer.depth(ux, uy) {
                    continue;
                }

                // Perspective-correct attribute weights, scaled by 1/w.
                let iw1 = b1 / w1;
                let iw2 = b2 / w2;
                let iw3 = b3 / w3;
                let inv = iw1 + iw2 + iw3;
                if inv == 0.0 {
                    continue;
                }
                let p1 = iw1 / inv;
                let p2 = iw2 / inv;
                let p3 = iw3 / inv;

                // The normal is left unnormalized; the shader owns that.
                let fragment = Vertex {
                    position: v1.position * p1 + v2.position * p2 + v3.position * p3,
                    normal: v1.normal * p1 + v2.normal * p2 + v3.normal * p3,
                    texcoord: v1.texcoord * p1 + v2.texcoord * p2 + v3.texcoord * p3,
                    color: v1.color * p1 + v2.color * p2 + v3.color * p3,
                    output: v1.output * p1 + v2.output * p2 + v3.output * p3,
                };

                if let Some(color) = self.shader.fragment(&fragment) {
                    self.framebuffer.set_pixel(ux, uy, color);
                    self.framebuffer.set_depth(ux, uy, z);
                }
            }
        }
    }

    /// Rasterize a line segment: same clip/divide/viewport stages as
    /// triangles, then a two-endpoint DDA walk with depth testing.
    pub fn draw_line(&mut self, line: &Line) {
        let a = self.shader.vertex(&line.v1);
        let b = self.shader.vertex(&line.v2);
        if a.output.is_degenerate() || b.output.is_degenerate() {
            return;
        }

        // Parametric clip against the six planes.
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for plane in 0..6 {
            let da = clip_distance(plane, &a.output);
            let db = clip_distance(plane, &b.output);
            if da < 0.0 && db < 0.0 {
                return;
            }
            if da < 0.0 {
                t0 = t0.max(da / (da - db));
            } else if db < 0.0 {
                t1 = t1.min(da / (da - db));
            }
        }
        if t0 > t1 {
            return;
        }

        let va = a.lerp(&b, t0);
        let vb = a.lerp(&b, t1);
        if va.output.w == 0.0 || vb.output.w == 0.0 {
            return;
        }

        let sa = self.screen_matrix.mul_position(&va.output.perspective_divide());
        let sb = self.screen_matrix.mul_position(&vb.output.perspective_divide());
        if sa.is_degenerate() || sb.is_degenerate() {
            return;
        }

        let width = self.framebuffer.width() as i64;
        let height = self.framebuffer.height() as i64;
        let steps = (sb.x - sa.x).abs().max((sb.y - sa.y).abs()).ceil() as i64;

        for i in 0..=steps.max(0) {
            let t = if steps > 0 { i as f64 / steps as f64 } else { 0.0 };
            let s = sa.lerp(&sb, t);
            let x = s.x.floor() as i64;
            let y = s.y.floor() as i64;
            if x < 0 || x >= width || y < 0 || y >= height {
                continue;
            }
            let (ux, uy) = (x as usize, y as usize);
            if self.framebuffer.write_depth && s.z > self.framebuffer.depth(ux, uy) {
                continue;
            }
            let fragment = va.lerp(&vb, t);
            if let Some(color) = self.shader.fragment(&fragment) {
                self.framebuffer.set_pixel(ux, uy, color);
                self.framebuffer.set_depth(ux, uy, s.z);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;
    use crate::math::Vector3;

    fn count_colored(fb: &Framebuffer) -> usize {
        let mut n = 0;
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.pixel(x, y).r > 0.5 {
                    n += 1;
                }
            }
        }
        n
    }

    fn red_context(matrix: Matrix4) -> RenderContext {
        let mut ctx = RenderContext::new(64, 64).unwrap();
        ctx.clear_color(Color::BLACK);
        ctx.shader = Box::new(SolidColorShader::new(matrix, Color::RED));
        ctx
    }

    fn ortho_camera() -> Matrix4 {
        Matrix4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0)
            * Matrix4::look_at(Vector3::new(0.0, 0.0, 5.0), Vector3::ZERO, Vector3::UP)
    }

    #[test]
    fn test_cube_covers_center() {
        let mut ctx = red_context(ortho_camera());
        ctx.draw_mesh(&primitives::cube());
        let fb = ctx.image();
        assert!(fb.pixel(32, 32).r > 0.5);
        assert!(fb.pixel(1, 1).r < 0.5);
        // The unit cube spans half the ortho volume: a quarter of pixels.
        let covered = count_colored(fb);
        assert!((900..1250).contains(&covered), "covered = {covered}");
    }

    #[test]
    fn test_empty_mesh_is_noop() {
        let mut ctx = red_context(ortho_camera());
        ctx.draw_mesh(&Mesh::new());
        assert_eq!(count_colored(ctx.image()), 0);
    }

    #[test]
    fn test_triangle_behind_near_plane_is_rejected() {
        let mut ctx = red_context(ortho_camera());
        // Behind the camera entirely.
        let t = Triangle::from_points(
            Vector3::new(-0.5, -0.5, 20.0),
            Vector3::new(0.5, -0.5, 20.0),
            Vector3::new(0.0, 0.5, 20.0),
        );
        ctx.draw_triangle(&t);
        assert_eq!(count_colored(ctx.image()), 0);
    }

    #[test]
    fn test_triangle_straddling_near_plane_is_clipped() {
        let camera = Matrix4::perspective(std::f64::consts::FRAC_PI_2, 1.0, 1.0, 100.0)
            * Matrix4::look_at(Vector3::new(0.0, 0.0, 5.0), Vector3::ZERO, Vector3::UP);
        let mut ctx = red_context(camera);
        // Spans from in front of the camera to behind it.
        let t = Triangle::from_points(
            Vector3::new(-50.0, -0.5, 0.0),
            Vector3::new(50.0, -0.5, 0.0),
            Vector3::new(0.0, -0.5, 20.0),
        );
        ctx.draw_triangle(&t);
        // Fragments appear, but only from the in-front portion.
        assert!(count_colored(ctx.image()) > 0);
    }

    #[test]
    fn test_degenerate_triangle_skipped() {
        let mut ctx = red_context(ortho_camera());
        let t = Triangle::from_points(
            Vector3::new(-0.5, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.5, 0.0, 0.0),
        );
        ctx.draw_triangle(&t);
        assert_eq!(count_colored(ctx.image()), 0);
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut ctx = RenderContext::new(16, 16).unwrap();
        ctx.clear_color(Color::BLACK);
        let camera = ortho_camera();
        // Far quad first, then near quad; near must win regardless of
        // order.
        let far = Triangle::from_points(
            Vector3::new(-1.0, -1.0, -2.0),
            Vector3::new(1.0, -1.0, -2.0),
            Vector3::new(0.0, 1.0, -2.0),
        );
        let near = Triangle::from_points(
            Vector3::new(-1.0, -1.0, 2.0),
            Vector3::new(1.0, -1.0, 2.0),
            Vector3::new(0.0, 1.0, 2.0),
        );
        ctx.shader = Box::new(SolidColorShader::new(camera, Color::BLUE));
        ctx.draw_triangle(&far);
        ctx.shader = Box::new(SolidColorShader::new(camera, Color::RED));
        ctx.draw_triangle(&near);
        assert!(ctx.image().pixel(8, 8).r > 0.5);

        let mut ctx2 = RenderContext::new(16, 16).unwrap();
        ctx2.clear_color(Color::BLACK);
        ctx2.shader = Box::new(SolidColorShader::new(camera, Color::RED));
        ctx2.draw_triangle(&near);
        ctx2.shader = Box::new(SolidColorShader::new(camera, Color::BLUE));
        ctx2.draw_triangle(&far);
        assert!(ctx2.image().pixel(8, 8).r > 0.5);
    }

    #[test]
    fn test_determinism() {
        let render = || {
            let mut ctx = red_context(ortho_camera());
            let mut mesh = primitives::sphere(2);
            mesh.smooth_normals();
            ctx.draw_mesh(&mesh);
            ctx.image().color_plane().to_vec()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_line_rasterization() {
        let mut ctx = red_context(ortho_camera());
        let mesh = Mesh::from_lines(vec![Line::from_points(
            Vector3::new(-0.9, 0.0, 0.0),
            Vector3::new(0.9, 0.0, 0.0),
        )]);
        ctx.draw_mesh(&mesh);
        let covered = count_colored(ctx.image());
        assert!(covered >= 55, "covered = {covered}");
    }
}
