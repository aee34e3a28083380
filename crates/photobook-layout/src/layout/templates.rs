//! Page grid geometry
//!
//! Every template splits the usable area evenly across its rows and columns,
//! leaving one gap between neighbours. Boxes are returned in slot order.

use crate::constants::L3C_WIDE_COLUMN_RATIO;

use super::{LayoutTemplate, Rect};

impl LayoutTemplate {
    /// Destination boxes of this template inside `area`
    pub fn boxes(self, area: &Rect, gap: f32) -> Vec<Rect> {
        let Rect {
            x,
            y,
            width,
            height,
        } = *area;
        let half_w = (width - gap) / 2.0;
        let half_h = (height - gap) / 2.0;
        let upper_y = y + half_h + gap;
        let right_x = x + half_w + gap;

        match self {
            LayoutTemplate::L1 => vec![*area],
            LayoutTemplate::L2H => vec![
                Rect::new(x, y, half_w, height),
                Rect::new(right_x, y, half_w, height),
            ],
            LayoutTemplate::L2V => vec![
                Rect::new(x, upper_y, width, half_h),
                Rect::new(x, y, width, half_h),
            ],
            LayoutTemplate::L3A => vec![
                Rect::new(x, upper_y, half_w, half_h),
                Rect::new(right_x, upper_y, half_w, half_h),
                Rect::new(x, y, width, half_h),
            ],
            LayoutTemplate::L3B | LayoutTemplate::L3D => vec![
                Rect::new(x, upper_y, width, half_h),
                Rect::new(x, y, half_w, half_h),
                Rect::new(right_x, y, half_w, half_h),
            ],
            LayoutTemplate::L3C => {
                // tall slot first, then the stacked pair on the left
                let left_w = (width - gap) * L3C_WIDE_COLUMN_RATIO;
                let right_w = (width - gap) * (1.0 - L3C_WIDE_COLUMN_RATIO);
                vec![
                    Rect::new(x + left_w + gap, y, right_w, height),
                    Rect::new(x, upper_y, left_w, half_h),
                    Rect::new(x, y, left_w, half_h),
                ]
            }
            LayoutTemplate::L4 => vec![
                Rect::new(x, upper_y, half_w, half_h),
                Rect::new(right_x, upper_y, half_w, half_h),
                Rect::new(x, y, half_w, half_h),
                Rect::new(right_x, y, half_w, half_h),
            ],
        }
    }
}
