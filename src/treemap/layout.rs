//! Squarified treemap layout.
//!
//! Bruls, Huizing & van Wijk: fill the shorter side of the free rectangle
//! with a row of items, adding items to the row while the worst aspect
//! ratio in it keeps improving, then continue in what is left.

/// An axis-aligned rectangle in SVG pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Shrink by `left/right/bottom = pad` and `top = pad + header`
    ///
    /// Returns `None` when nothing usable is left.
    pub fn inset(&self, pad: f64, header: f64) -> Option<Rect> {
        let w = self.w - 2.0 * pad;
        let h = self.h - 2.0 * pad - header;
        if w <= 1.0 || h <= 1.0 {
            return None;
        }
        Some(Rect::new(self.x + pad, self.y + pad + header, w, h))
    }
}

/// Lay out `values` inside `bounds`
///
/// **Public** - used by the SVG generator
///
/// Values should be sorted in descending order for good aspect ratios.
/// The output has exactly one rectangle per input value, in input order;
/// items that do not fit get an empty rectangle.
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let empty = Rect::new(bounds.x, bounds.y, 0.0, 0.0);
    let sum: f64 = values.iter().map(|v| v.max(0.0)).sum();
    if sum <= 0.0 || bounds.area() <= 0.0 {
        return vec![empty; values.len()];
    }

    let scale = bounds.area() / sum;
    let areas: Vec<f64> = values.iter().map(|v| v.max(0.0) * scale).collect();

    let mut out = Vec::with_capacity(areas.len());
    let mut free = bounds;
    let mut start = 0;

    while start < areas.len() {
        if free.w <= 1e-9 || free.h <= 1e-9 {
            out.resize(areas.len(), empty);
            break;
        }

        let side = free.w.min(free.h);
        let mut end = start + 1;
        let mut current = worst_aspect_ratio(&areas[start..end], side);
        while end < areas.len() {
            let next = worst_aspect_ratio(&areas[start..=end], side);
            if next > current {
                break;
            }
            current = next;
            end += 1;
        }

        layout_row(&areas[start..end], &mut free, &mut out);
        start = end;
    }

    out
}

/// Worst (largest) aspect ratio of a row laid along a side of length `side`
fn worst_aspect_ratio(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    let max = row.iter().copied().fold(0.0, f64::max);
    let min = row.iter().copied().fold(f64::INFINITY, f64::min);
    if sum <= 0.0 || min <= 0.0 {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

/// Place one row along the shorter side and shrink the free rectangle
fn layout_row(row: &[f64], free: &mut Rect, out: &mut Vec<Rect>) {
    let row_sum: f64 = row.iter().sum();
    if row_sum <= 0.0 {
        out.extend(row.iter().map(|_| Rect::new(free.x, free.y, 0.0, 0.0)));
        return;
    }

    if free.w >= free.h {
        // Column on the left, items stacked top to bottom
        let thickness = (row_sum / free.h).min(free.w);
        let mut y = free.y;
        for area in row {
            let h = area / thickness;
            out.push(Rect::new(free.x, y, thickness, h));
            y += h;
        }
        free.x += thickness;
        free.w -= thickness;
    } else {
        // Strip on top, items left to right
        let thickness = (row_sum / free.w).min(free.h);
        let mut x = free.x;
        for area in row {
            let w = area / thickness;
            out.push(Rect::new(x, free.y, w, thickness));
            x += w;
        }
        free.y += thickness;
        free.h -= thickness;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_squarify_preserves_proportions() {
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let bounds = Rect::new(0.0, 0.0, 6.0, 4.0);
        let rects = squarify(&values, bounds);

        assert_eq!(rects.len(), values.len());
        for (rect, value) in rects.iter().zip(values) {
            assert!(close(rect.area(), value), "{:?} vs {}", rect, value);
        }
        let total: f64 = rects.iter().map(Rect::area).sum();
        assert!(close(total, bounds.area()));
    }

    #[test]
    fn test_squarify_stays_inside_bounds() {
        let values = [50.0, 30.0, 10.0, 5.0, 5.0];
        let bounds = Rect::new(10.0, 20.0, 300.0, 100.0);
        for rect in squarify(&values, bounds) {
            assert!(rect.x >= bounds.x - 1e-6);
            assert!(rect.y >= bounds.y - 1e-6);
            assert!(rect.x + rect.w <= bounds.x + bounds.w + 1e-6);
            assert!(rect.y + rect.h <= bounds.y + bounds.h + 1e-6);
        }
    }

    #[test]
    fn test_squarify_single_item_fills_bounds() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rects = squarify(&[42.0], bounds);
        assert_eq!(rects.len(), 1);
        assert!(close(rects[0].x, 0.0) && close(rects[0].y, 0.0));
        assert!(close(rects[0].w, 100.0) && close(rects[0].h, 50.0));
    }

    #[test]
    fn test_squarify_zero_values() {
        let rects = squarify(&[0.0, 0.0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rects.len(), 2);
        assert!(rects.iter().all(|r| r.area() == 0.0));
    }

    #[test]
    fn test_inset() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(rect.inset(2.0, 16.0), Some(Rect::new(2.0, 18.0, 96.0, 30.0)));
        assert_eq!(Rect::new(0.0, 0.0, 4.0, 4.0).inset(2.0, 0.0), None);
    }
}
