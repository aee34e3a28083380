//! Layout selection
//!
//! Maps a group of photos to a template and to the order in which the photos
//! fill the template's boxes.

use crate::photo::LayoutItem;
use crate::types::{BookError, Result, SlotType};

use super::{LayoutTemplate, Rect};

/// A template choice for one group
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSelection {
    pub layout: LayoutTemplate,
    /// `order[slot]` is the index into the group of the photo in that slot
    pub order: Vec<usize>,
    /// Destination boxes, one per entry of `order`
    pub boxes: Vec<Rect>,
}

/// Pick a template for a group and the photo order that fills it.
///
/// Groups larger than four fall back to `L1` with only the first photo.
pub fn choose_layout<T: LayoutItem>(group: &[T]) -> Result<(LayoutTemplate, Vec<usize>)> {
    match group.len() {
        0 => Err(BookError::Structure("cannot lay out an empty group".to_string())),
        1 => Ok((LayoutTemplate::L1, vec![0])),
        2 => Ok(choose_pair(group[0].slot_type(), group[1].slot_type())),
        3 => Ok(choose_triple(group)),
        4 => Ok((LayoutTemplate::L4, vec![0, 1, 2, 3])),
        n => {
            log::warn!("Group of {} photos exceeds the largest template; keeping the first", n);
            Ok((LayoutTemplate::L1, vec![0]))
        }
    }
}

fn choose_pair(first: SlotType, second: SlotType) -> (LayoutTemplate, Vec<usize>) {
    use SlotType::*;

    let keep = vec![0, 1];
    let swap = vec![1, 0];

    match (first, second) {
        (VerticalLeft, VerticalRight) => (LayoutTemplate::L2H, keep),
        (VerticalRight, VerticalLeft) => (LayoutTemplate::L2H, swap),
        (HorizontalTop, HorizontalBottom) => (LayoutTemplate::L2V, keep),
        (HorizontalBottom, HorizontalTop) => (LayoutTemplate::L2V, swap),
        _ if first.is_vertical_half() || second.is_vertical_half() => {
            // honour whichever side was tagged
            if first == VerticalRight || second == VerticalLeft {
                (LayoutTemplate::L2H, swap)
            } else {
                (LayoutTemplate::L2H, keep)
            }
        }
        _ if first.is_horizontal_half() || second.is_horizontal_half() => (LayoutTemplate::L2V, keep),
        _ => (LayoutTemplate::L2H, keep),
    }
}

fn choose_triple<T: LayoutItem>(group: &[T]) -> (LayoutTemplate, Vec<usize>) {
    let (horizontal, tall): (Vec<usize>, Vec<usize>) =
        (0..group.len()).partition(|&i| group[i].orientation().is_horizontal());

    if tall.len() == 1 && horizontal.len() == 2 {
        let mut order = tall;
        order.extend(horizontal);
        return (LayoutTemplate::L3C, order);
    }
    if horizontal.len() == 3 {
        return (LayoutTemplate::L3D, vec![0, 1, 2]);
    }
    if group[0].orientation().is_horizontal() && group[1].orientation().is_horizontal() {
        (LayoutTemplate::L3A, vec![0, 1, 2])
    } else {
        (LayoutTemplate::L3B, vec![0, 1, 2])
    }
}

/// Choose a template for a group and compute its boxes inside `area`
pub fn select_layout<T: LayoutItem>(group: &[T], area: &Rect, gap: f32) -> Result<LayoutSelection> {
    let (layout, order) = choose_layout(group)?;
    let boxes = layout.boxes(area, gap);
    Ok(LayoutSelection {
        layout,
        order,
        boxes,
    })
}
