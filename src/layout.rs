use macroquad::math::{Rect, Vec2};
use std::iter::Peekable;

struct SplitIter {
    index: usize,
    size: f32,
}

impl SplitIter {
    fn new(size: f32) -> Self {
        Self { index: 0, size }
    }
}

impl Iterator for SplitIter {
    type Item = (usize, f32);
    fn next(&mut self) -> Option<Self::Item> {
        self.index += 1;
        let n = self.index;
        Some((n, self.size / n as f32))
    }
}

struct GridSizeIter {
    x_iter: Peekable<SplitIter>,
    y_iter: Peekable<SplitIter>,
    aspect: f32,
}

impl GridSizeIter {
    fn new(w: f32, h: f32, aspect: f32) -> Self {
        Self {
            x_iter: SplitIter::new(w).peekable(),
            y_iter: SplitIter::new(h).peekable(),
            aspect,
        }
    }
}

impl Iterator for GridSizeIter {
    type Item = ((usize, usize), (f32, f32));
    fn next(&mut self) -> Option<Self::Item> {
        let (nx, sx) = *self.x_iter.peek()?;
        let (ny, sy) = *self.y_iter.peek()?;
        if sx >= sy * self.aspect {
            self.x_iter.next();
        } else {
            self.y_iter.next();
        }
        Some(((nx, ny), (sx, sy)))
    }
}

/// Splits `area` into at least `n` cells, keeping each cell close to `aspect` (width / height).
///
/// Rows are filled left to right and the last row may be partial.
pub fn grid(area: Rect, n: usize, aspect: f32) -> Vec<Vec<Rect>> {
    if n == 0 {
        return Vec::new();
    }
    let ((nx, ny), (sx, sy)) = GridSizeIter::new(area.w, area.h, aspect)
        .find(|((nx, ny), _)| nx * ny >= n)
        .unwrap_or(((n, 1), (area.w / n as f32, area.h)));
    let mut count = 0;
    let mut boxes = Vec::new();
    'outer: for iy in 0..ny {
        let mut line = Vec::new();
        for ix in 0..nx {
            line.push(Rect::new(
                area.x + sx * ix as f32,
                area.y + sy * iy as f32,
                sx,
                sy,
            ));
            count += 1;
            if count >= n {
                boxes.push(line);
                break 'outer;
            }
        }
        boxes.push(line);
    }
    boxes
}

/// Fixed `cols` x `rows` board inside `area`, cells separated by `gap`, in row-major order.
pub fn board(area: Rect, cols: usize, rows: usize, gap: f32) -> Vec<Rect> {
    let w = (area.w - gap * (cols as f32 - 1.0)) / cols as f32;
    let h = (area.h - gap * (rows as f32 - 1.0)) / rows as f32;
    (0..rows)
        .flat_map(|r| {
            (0..cols).map(move |c| {
                Rect::new(
                    area.x + c as f32 * (w + gap),
                    area.y + r as f32 * (h + gap),
                    w,
                    h,
                )
            })
        })
        .collect()
}

/// Rect of `size` centered on `center`.
pub fn centered(center: Vec2, size: Vec2) -> Rect {
    Rect::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
}

/// Square of half the shortest side, centered in `rect`.
pub fn preview_square(rect: Rect) -> Rect {
    let size = rect.size().min_element() / 2.0;
    centered(rect.center(), Vec2::splat(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn grid_fits_ten_cards() {
        let boxes = grid(Rect::new(0.0, 0.0, 1200.0, 600.0), 10, 1.0);
        let cells: Vec<_> = boxes.iter().flatten().collect();
        assert_eq!(cells.len(), 10);
        assert!(boxes.len() > 1);
        for cell in &cells {
            assert!(cell.right() <= 1200.0 + 1e-3);
            assert!(cell.bottom() <= 600.0 + 1e-3);
        }
        assert!(boxes[0].len() >= boxes.last().unwrap().len());
    }

    #[test]
    fn grid_of_nothing_is_empty() {
        assert!(grid(Rect::new(0.0, 0.0, 10.0, 10.0), 0, 1.0).is_empty());
    }

    #[test]
    fn board_cells_are_row_major() {
        let cells = board(Rect::new(10.0, 20.0, 320.0, 320.0), 3, 3, 10.0);
        assert_eq!(cells.len(), 9);
        assert_abs_diff_eq!(cells[0].w, 100.0);
        assert_abs_diff_eq!(cells[1].x, 120.0);
        assert_abs_diff_eq!(cells[3].y, 130.0);
        assert_abs_diff_eq!(cells[8].right(), 330.0);
        assert_abs_diff_eq!(cells[8].bottom(), 340.0);
    }

    #[test]
    fn centered_rect() {
        let rect = centered(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        assert_eq!(rect, Rect::new(40.0, 45.0, 20.0, 10.0));
    }
}
