//! Sprite layout: one-dimensional stacking of images along an axis.
//!
//! Images are placed in the order given. The first image sits at the origin
//! and each following image is offset further into negative coordinates by
//! the size of everything before it plus `spacing`. Offsets are stored
//! negative (the value a CSS `background-position` needs) and consumed as
//! absolute distances by the compositor.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::ImageDescriptor;

/// Stacking axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Placed images and the resulting canvas size.
#[derive(Debug, Clone)]
pub struct Layout {
    pub images: Vec<ImageDescriptor>,
    pub width: u32,
    pub height: u32,
}

/// Stacks images along one axis with a fixed gap between neighbours.
#[derive(Debug, Clone, Copy)]
pub struct StackLayout {
    pub orientation: Orientation,
    pub spacing: u32,
}

impl StackLayout {
    pub fn new(orientation: Orientation, spacing: u32) -> Self {
        Self {
            orientation,
            spacing,
        }
    }

    /// Assign offsets to `images` in place and return the canvas size.
    ///
    /// Returns `None` when the stacked length does not fit in a `u32`.
    pub fn arrange(&self, images: &mut [ImageDescriptor]) -> Option<(u32, u32)> {
        let mut cursor: i64 = 0;
        let mut along: u64 = 0;
        let mut across: u32 = 0;

        for (i, image) in images.iter_mut().enumerate() {
            image.reset_offsets();

            let (extent, breadth) = match self.orientation {
                Orientation::Vertical => (image.height, image.width),
                Orientation::Horizontal => (image.width, image.height),
            };

            match self.orientation {
                Orientation::Vertical => image.top = cursor,
                Orientation::Horizontal => image.left = cursor,
            }

            if i > 0 {
                along += u64::from(self.spacing);
            }
            along += u64::from(extent);
            across = across.max(breadth);
            cursor -= i64::from(extent) + i64::from(self.spacing);
        }

        let along = u32::try_from(along).ok()?;
        match self.orientation {
            Orientation::Vertical => Some((across, along)),
            Orientation::Horizontal => Some((along, across)),
        }
    }

    /// Place owned images and return them with the canvas size.
    pub fn layout(&self, mut images: Vec<ImageDescriptor>) -> Option<Layout> {
        let (width, height) = self.arrange(&mut images)?;
        Some(Layout {
            images,
            width,
            height,
        })
    }
}

/// Shorthand for `StackLayout::new(orientation, spacing).layout(images)`.
pub fn layout(
    images: Vec<ImageDescriptor>,
    orientation: Orientation,
    spacing: u32,
) -> Option<Layout> {
    StackLayout::new(orientation, spacing).layout(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::ImageKind;

    fn make_image(name: &str, w: u32, h: u32) -> ImageDescriptor {
        ImageDescriptor::new(name, w, h, ImageKind::Raster).unwrap()
    }

    fn offsets(layout: &Layout) -> Vec<(i64, i64)> {
        layout.images.iter().map(|i| (i.left, i.top)).collect()
    }

    #[test]
    fn test_single_image_at_origin() {
        let layout = layout(vec![make_image("a.png", 7, 3)], Orientation::Vertical, 10)
            .unwrap();

        assert_eq!((layout.width, layout.height), (7, 3));
        assert_eq!(offsets(&layout), vec![(0, 0)]);
    }

    #[test]
    fn test_vertical_without_spacing() {
        let images = vec![
            make_image("a.png", 4, 10),
            make_image("b.png", 8, 5),
            make_image("c.png", 2, 7),
        ];
        let layout = layout(images, Orientation::Vertical, 0).unwrap();

        assert_eq!(layout.width, 8);
        assert_eq!(layout.height, 22);
        assert_eq!(offsets(&layout), vec![(0, 0), (0, -10), (0, -15)]);
    }

    #[test]
    fn test_vertical_with_spacing() {
        let images = vec![
            make_image("a.png", 4, 10),
            make_image("b.png", 8, 5),
            make_image("c.png", 2, 7),
        ];
        let layout = layout(images, Orientation::Vertical, 3).unwrap();

        assert_eq!(layout.height, 10 + 5 + 7 + 3 * 2);
        assert_eq!(offsets(&layout), vec![(0, 0), (0, -13), (0, -21)]);
    }

    #[test]
    fn test_horizontal_with_spacing() {
        let images = vec![make_image("a.png", 10, 4), make_image("b.png", 5, 8)];
        let layout = layout(images, Orientation::Horizontal, 2).unwrap();

        assert_eq!((layout.width, layout.height), (17, 8));
        assert_eq!(offsets(&layout), vec![(0, 0), (-12, 0)]);
    }

    #[test]
    fn test_horizontal_is_transpose_of_vertical() {
        let sizes = [(3, 9), (6, 2), (5, 5), (1, 4)];
        let vertical = layout(
            sizes.iter().map(|&(w, h)| make_image("v.png", w, h)).collect(),
            Orientation::Vertical,
            4,
        )
        .unwrap();
        let horizontal = layout(
            sizes.iter().map(|&(w, h)| make_image("h.png", h, w)).collect(),
            Orientation::Horizontal,
            4,
        )
        .unwrap();

        assert_eq!(
            (vertical.width, vertical.height),
            (horizontal.height, horizontal.width)
        );
        for (v, h) in vertical.images.iter().zip(&horizontal.images) {
            assert_eq!((v.left, v.top), (h.top, h.left));
        }
    }

    #[test]
    fn test_offsets_are_negative_prefix_sums() {
        let heights = [3u32, 1, 4, 1, 5, 9, 2, 6];
        let images = heights
            .iter()
            .map(|&h| make_image("x.png", 2, h))
            .collect();
        let layout = layout(images, Orientation::Vertical, 0).unwrap();

        let mut expected = 0i64;
        for (image, &h) in layout.images.iter().zip(&heights) {
            assert_eq!(image.top, expected);
            assert_eq!(image.left, 0);
            expected -= i64::from(h);
        }
        assert_eq!(layout.height, heights.iter().sum::<u32>());
    }

    #[test]
    fn test_arrange_is_repeatable() {
        let mut images = vec![make_image("a.png", 4, 4), make_image("b.png", 4, 4)];
        let engine = StackLayout::new(Orientation::Vertical, 1);

        let first = engine.arrange(&mut images).unwrap();
        let first_offsets: Vec<i64> = images.iter().map(|i| i.top).collect();
        let second = engine.arrange(&mut images).unwrap();
        let second_offsets: Vec<i64> = images.iter().map(|i| i.top).collect();

        assert_eq!(first, second);
        assert_eq!(first_offsets, second_offsets);
    }

    #[test]
    fn test_switching_orientation_resets_cross_axis() {
        let mut images = vec![make_image("a.png", 4, 4), make_image("b.png", 4, 4)];
        StackLayout::new(Orientation::Vertical, 0).arrange(&mut images).unwrap();
        StackLayout::new(Orientation::Horizontal, 0).arrange(&mut images).unwrap();

        assert_eq!(images[1].top, 0);
        assert_eq!(images[1].left, -4);
    }

    #[test]
    fn test_overflowing_stack_is_rejected() {
        let tall = u32::MAX / 2 + 1;
        let images = vec![make_image("a.png", 1, tall), make_image("b.png", 1, tall)];

        assert!(layout(images.clone(), Orientation::Vertical, 0).is_none());
        assert!(layout(images, Orientation::Horizontal, 0).is_some());
    }

    #[test]
    fn test_spacing_can_overflow_stack() {
        let images = vec![make_image("a.png", 1, 1), make_image("b.png", 1, 1)];
        assert!(layout(images, Orientation::Vertical, u32::MAX).is_none());
    }
}
