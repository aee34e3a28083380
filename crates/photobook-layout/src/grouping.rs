//! Grouping of a photo stream into pages
//!
//! A single greedy pass from left to right. Every photo lands in exactly one
//! group and groups keep the input order.

use std::ops::Range;

use crate::constants::{MAX_GROUP_SIZE, QUAD_MIN_SIMPLE, TRIPLE_MIN_HORIZONTAL};
use crate::photo::LayoutItem;
use crate::types::{BookError, Result, SlotType};

/// A run of 1 to 4 consecutive photos that share a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    start: usize,
    len: usize,
}

impl Group {
    pub fn new(start: usize, len: usize) -> Result<Self> {
        if !(1..=MAX_GROUP_SIZE).contains(&len) {
            return Err(BookError::Structure(format!(
                "group size must be between 1 and {}, got {}",
                MAX_GROUP_SIZE, len
            )));
        }
        Ok(Self { start, len })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Indices of the group's photos in the input sequence
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Partition an ordered photo sequence into page groups
pub fn group_items<T: LayoutItem>(items: &[T]) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut i = 0;

    while i < items.len() {
        let size = next_group_size(&items[i..]);
        groups.push(Group { start: i, len: size });
        i += size;
    }

    log::debug!("Grouped {} photos into {} pages", items.len(), groups.len());
    groups
}

/// Size of the group starting at the head of `rest` (never empty)
fn next_group_size<T: LayoutItem>(rest: &[T]) -> usize {
    let slot = rest[0].slot_type();

    if slot == SlotType::Full {
        return 1;
    }
    if slot.is_vertical_half() {
        return pair_or_single(rest, SlotType::is_vertical_half);
    }
    if slot.is_horizontal_half() {
        return pair_or_single(rest, SlotType::is_horizontal_half);
    }

    // auto/square run, capped at the next special tag
    let run = rest
        .iter()
        .take(MAX_GROUP_SIZE)
        .take_while(|item| !item.slot_type().is_special())
        .count();

    if run >= 4 {
        let simple = rest[..4]
            .iter()
            .filter(|item| item.slot_type() == SlotType::Square || item.is_simple())
            .count();
        if simple >= QUAD_MIN_SIMPLE {
            return 4;
        }
    }
    if run >= 3 {
        let horizontal = rest[..3]
            .iter()
            .filter(|item| item.orientation().is_horizontal())
            .count();
        if horizontal >= TRIPLE_MIN_HORIZONTAL {
            return 3;
        }
    }
    if run >= 2 { 2 } else { 1 }
}

fn pair_or_single<T: LayoutItem>(rest: &[T], same_family: fn(SlotType) -> bool) -> usize {
    match rest.get(1).map(|next| next.slot_type()) {
        Some(next) if same_family(next) || matches!(next, SlotType::Square | SlotType::Auto) => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhotoOrientation;

    #[derive(Clone)]
    struct Item {
        slot: SlotType,
        orientation: PhotoOrientation,
        simple: bool,
    }

    impl LayoutItem for Item {
        fn slot_type(&self) -> SlotType {
            self.slot
        }
        fn orientation(&self) -> PhotoOrientation {
            self.orientation
        }
        fn is_simple(&self) -> bool {
            self.simple
        }
    }

    fn wide(slot: SlotType) -> Item {
        Item {
            slot,
            orientation: PhotoOrientation::Wide,
            simple: true,
        }
    }

    fn sizes(items: &[Item]) -> Vec<usize> {
        group_items(items).iter().map(Group::len).collect()
    }

    #[test]
    fn test_group_size_bounds() {
        assert!(Group::new(0, 0).is_err());
        assert!(Group::new(0, 5).is_err());
        assert_eq!(Group::new(3, 2).unwrap().range(), 3..5);
    }

    #[test]
    fn test_five_simple_photos_make_quad_then_single() {
        let items = vec![wide(SlotType::Auto); 5];
        assert_eq!(sizes(&items), vec![4, 1]);
    }

    #[test]
    fn test_crowded_wide_photos_make_triple_then_pair() {
        let crowded = Item {
            simple: false,
            ..wide(SlotType::Auto)
        };
        let items = vec![crowded; 5];
        assert_eq!(sizes(&items), vec![3, 2]);
    }

    #[test]
    fn test_square_tags_count_as_simple() {
        let crowded = Item {
            simple: false,
            ..wide(SlotType::Square)
        };
        let items = vec![crowded; 4];
        assert_eq!(sizes(&items), vec![4]);
    }

    #[test]
    fn test_tall_crowded_photos_pair_up() {
        let tall = Item {
            slot: SlotType::Auto,
            orientation: PhotoOrientation::Tall,
            simple: false,
        };
        assert_eq!(sizes(&vec![tall; 5]), vec![2, 2, 1]);
    }

    #[test]
    fn test_full_photo_stands_alone() {
        let items = vec![
            wide(SlotType::Auto),
            wide(SlotType::Full),
            wide(SlotType::Auto),
            wide(SlotType::Auto),
        ];
        assert_eq!(sizes(&items), vec![1, 1, 2]);
    }

    #[test]
    fn test_vertical_tags_pair() {
        let items = vec![wide(SlotType::VerticalLeft), wide(SlotType::VerticalRight)];
        let groups = group_items(&items);
        assert_eq!(groups, vec![Group::new(0, 2).unwrap()]);
    }

    #[test]
    fn test_vertical_tag_refuses_horizontal_partner() {
        let items = vec![wide(SlotType::VerticalLeft), wide(SlotType::HorizontalTop), wide(SlotType::Auto)];
        assert_eq!(sizes(&items), vec![1, 2]);
    }

    #[test]
    fn test_horizontal_tag_pairs_with_square() {
        let items = vec![wide(SlotType::HorizontalBottom), wide(SlotType::Square)];
        assert_eq!(sizes(&items), vec![2]);
        let items = vec![wide(SlotType::HorizontalBottom), wide(SlotType::Full)];
        assert_eq!(sizes(&items), vec![1, 1]);
    }

    #[test]
    fn test_special_tag_caps_auto_run() {
        let items = vec![
            wide(SlotType::Auto),
            wide(SlotType::Auto),
            wide(SlotType::Auto),
            wide(SlotType::VerticalLeft),
            wide(SlotType::VerticalRight),
        ];
        assert_eq!(sizes(&items), vec![3, 2]);
    }

    #[test]
    fn test_trailing_single_vertical() {
        assert_eq!(sizes(&[wide(SlotType::VerticalRight)]), vec![1]);
    }

    #[test]
    fn test_groups_cover_input_in_order() {
        use SlotType::*;
        let slots = [
            Auto, Square, Full, VerticalRight, Auto, Auto, HorizontalTop, HorizontalTop, Auto,
            VerticalLeft, Full, Auto, Auto, Auto, Auto, Auto, Square,
        ];
        let items: Vec<Item> = slots
            .iter()
            .enumerate()
            .map(|(i, &slot)| Item {
                slot,
                orientation: if i % 3 == 0 { PhotoOrientation::Tall } else { PhotoOrientation::Wide },
                simple: i % 2 == 0,
            })
            .collect();

        let groups = group_items(&items);
        let mut next = 0;
        for group in &groups {
            assert_eq!(group.start(), next);
            assert!((1..=4).contains(&group.len()));
            next = group.range().end;
        }
        assert_eq!(next, items.len());
        for group in &groups {
            if group.range().any(|i| items[i].slot == Full) {
                assert_eq!(group.len(), 1);
            }
        }
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(group_items::<Item>(&[]).is_empty());
    }
}
