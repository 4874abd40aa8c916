//! Primitive rasterization for basic geometric shapes.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

// ============================================================================
// Line drawing
// ============================================================================

/// Draw a line using Bresenham's algorithm (non-antialiased).
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        if x >= 0 && y >= 0 {
            fb.blend_pixel(x as u32, y as u32, color);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels per step along the major axis, weighted by the fractional
/// distance from the ideal line position.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep {
        (y0, x0, y1, x1)
    } else {
        (x0, y0, x1, y1)
    };
    let (x0, y0, x1, y1) = if x0 > x1 {
        (x1, y1, x0, y0)
    } else {
        (x0, y0, x1, y1)
    };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f64::EPSILON { 1.0 } else { dy / dx };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;

    if steep {
        plot(fb, ypxl1, xpxl1, color, rfpart(yend) * xgap);
        plot(fb, ypxl1 + 1, xpxl1, color, fpart(yend) * xgap);
    } else {
        plot(fb, xpxl1, ypxl1, color, rfpart(yend) * xgap);
        plot(fb, xpxl1, ypxl1 + 1, color, fpart(yend) * xgap);
    }

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;

    if steep {
        plot(fb, ypxl2, xpxl2, color, rfpart(yend) * xgap);
        plot(fb, ypxl2 + 1, xpxl2, color, fpart(yend) * xgap);
    } else {
        plot(fb, xpxl2, ypxl2, color, rfpart(yend) * xgap);
        plot(fb, xpxl2, ypxl2 + 1, color, fpart(yend) * xgap);
    }

    // Main loop
    if steep {
        for x in (xpxl1 + 1)..xpxl2 {
            let ipart = intery.floor() as i32;
            plot(fb, ipart, x, color, rfpart(intery));
            plot(fb, ipart + 1, x, color, fpart(intery));
            intery += gradient;
        }
    } else {
        for x in (xpxl1 + 1)..xpxl2 {
            let ipart = intery.floor() as i32;
            plot(fb, x, ipart, color, rfpart(intery));
            plot(fb, x, ipart + 1, color, fpart(intery));
            intery += gradient;
        }
    }
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f64) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        let alpha = (f64::from(color.a) * intensity) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

/// Fractional part of a float.
#[inline]
fn fpart(x: f64) -> f64 {
    x - x.floor()
}

/// One minus the fractional part.
#[inline]
fn rfpart(x: f64) -> f64 {
    1.0 - fpart(x)
}

// ============================================================================
// Fills
// ============================================================================

/// Fill a circle.
pub fn fill_circle(fb: &mut Framebuffer, center: Point, radius: f64, color: Rgba) {
    let r = radius.max(0.0);
    let x_min = (center.x - r).floor() as i32;
    let x_max = (center.x + r).ceil() as i32;
    let y_min = (center.y - r).floor() as i32;
    let y_max = (center.y + r).ceil() as i32;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            if x < 0 || y < 0 {
                continue;
            }
            let d = center.distance(Point::new(f64::from(x), f64::from(y)));
            if d <= r {
                fb.blend_pixel(x as u32, y as u32, color);
            } else if d <= r + 1.0 {
                // Soft one-pixel edge
                let alpha = (f64::from(color.a) * (r + 1.0 - d)) as u8;
                fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
            }
        }
    }
}

/// Fill a closed polygon by even-odd scanline.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[Point], color: Rgba) {
    if points.len() < 3 {
        return;
    }

    let y_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let y_start = y_min.floor().max(0.0) as i32;
    let y_end = y_max.ceil().min(f64::from(fb.height())) as i32;

    for y in y_start..y_end {
        let scan_y = f64::from(y) + 0.5;
        let mut crossings: Vec<f64> = Vec::new();

        let n = points.len();
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (points[i], points[j]);
            if (a.y > scan_y) != (b.y > scan_y) {
                crossings.push((b.x - a.x) * (scan_y - a.y) / (b.y - a.y) + a.x);
            }
            j = i;
        }

        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].round().max(0.0) as u32;
            let x1 = pair[1].round().max(0.0) as u32;
            for x in x0..x1 {
                fb.blend_pixel(x, y as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_line_horizontal() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        draw_line(&mut fb, 0, 5, 9, 5, Rgba::RED);
        assert_eq!(fb.get_pixel(0, 5), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(9, 5), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(5, 4), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_draw_line_diagonal() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        draw_line(&mut fb, 0, 0, 9, 9, Rgba::RED);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(9, 9), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::RED));
    }

    #[test]
    fn test_draw_line_aa_touches_endpoints() {
        let mut fb = Framebuffer::new(20, 20).unwrap();
        draw_line_aa(&mut fb, 2.0, 2.0, 17.0, 11.0, Rgba::RED);
        // Some coverage near both endpoints
        assert!(fb.get_pixel(2, 2).map(|p| p.a).unwrap_or(0) > 0);
        assert!(fb.get_pixel(17, 11).map(|p| p.a).unwrap_or(0) > 0);
    }

    #[test]
    fn test_fill_circle() {
        let mut fb = Framebuffer::new(20, 20).unwrap();
        fill_circle(&mut fb, Point::new(10.0, 10.0), 4.0, Rgba::RED);
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(10, 7), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(1, 1), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_fill_polygon_square() {
        let mut fb = Framebuffer::new(20, 20).unwrap();
        fill_polygon(
            &mut fb,
            &[
                Point::new(5.0, 5.0),
                Point::new(15.0, 5.0),
                Point::new(15.0, 15.0),
                Point::new(5.0, 15.0),
            ],
            Rgba::RED,
        );
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_fill_polygon_degenerate() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fill_polygon(
            &mut fb,
            &[Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
            Rgba::RED,
        );
        // Nothing drawn, nothing panicked
        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::TRANSPARENT));
    }
}
