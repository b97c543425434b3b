// src/processor/tests.rs

//! Unit tests for the processor: drawing primitives, translation and
//! shifting, block transfers, blended copies, stencils and the pure
//! geometric and channel transformations.

use test_log::test; // For logging within tests

use super::*;

fn gray_3x2() -> Pixmap<u8> {
    Pixmap::<u8>::from_raw(3, 2, ChannelMode::Grayscale, vec![1, 2, 3, 4, 5, 6])
        .expect("construction should succeed")
}

fn rgb_corners_2x2() -> Pixmap<u8> {
    let mut pixmap = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");

    pixmap.set_pixel(0, 0, &Color::RED).unwrap();
    pixmap.set_pixel(1, 0, &Color::GREEN).unwrap();
    pixmap.set_pixel(0, 1, &Color::BLUE).unwrap();
    pixmap.set_pixel(1, 1, &Color::WHITE).unwrap();

    pixmap
}

#[test]
fn test_scale_value_scales_every_component() {
    let mut pixmap =
        Pixmap::<u8>::filled(2, 2, ChannelMode::Rgb, &Color::WHITE).expect("fill should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor.scale_value(0.5).expect("scaling should succeed");

    assert_eq!(
        pixmap.data(),
        &[128; 12][..],
        "every component should be halved"
    );
    assert!(
        pixmap.updated_region().is_some(),
        "scaling should mark the updated region"
    );
}

#[test]
fn test_scale_value_channel_touches_one_channel() {
    let mut pixmap =
        Pixmap::<u8>::filled(1, 1, ChannelMode::Rgb, &Color::GREY).expect("fill should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .scale_value_channel(2.0, Channel::Red)
        .expect("scaling should succeed");

    assert_eq!(
        pixmap.pixel_element(0, 0, Channel::Red).unwrap(),
        255,
        "red should be doubled and clamped"
    );
    assert_eq!(
        pixmap.pixel_element(0, 0, Channel::Green).unwrap(),
        128,
        "green should be untouched"
    );
}

#[test]
fn test_scale_value_rejects_invalid_pixmap() {
    let mut pixmap = Pixmap::<u8>::default();

    let mut processor = Processor::new(&mut pixmap);

    assert_eq!(processor.scale_value(0.5), Err(Error::InvalidPixmap));
}

#[test]
fn test_draw_segment_horizontal_row() {
    let mut pixmap = Pixmap::<u8>::new(5, 5, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_segment(
            Point::new(0, 2),
            Point::new(4, 2),
            &Color::WHITE,
            BlendMode::Replace,
        )
        .expect("drawing should succeed");

    for x in 0..5 {
        assert_eq!(
            pixmap.pixel(x, 2).unwrap(),
            Color::WHITE,
            "row 2 should be painted at column {}",
            x
        );
        assert_eq!(
            pixmap.pixel(x, 1).unwrap(),
            Color::BLACK,
            "row 1 should stay black at column {}",
            x
        );
    }
}

#[test]
fn test_draw_segment_diagonal() {
    let mut pixmap = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_segment(
            Point::new(0, 0),
            Point::new(3, 3),
            &Color::WHITE,
            BlendMode::Replace,
        )
        .expect("drawing should succeed");

    for index in 0..4 {
        assert_eq!(
            pixmap.pixel(index, index).unwrap(),
            Color::WHITE,
            "the diagonal should be painted at ({}, {})",
            index,
            index
        );
    }

    assert_eq!(pixmap.pixel(1, 0).unwrap(), Color::BLACK);
    assert_eq!(pixmap.pixel(0, 1).unwrap(), Color::BLACK);
}

#[test]
fn test_draw_segment_clamps_outside_endpoints() {
    let mut pixmap = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_segment(
            Point::new(-2, 1),
            Point::new(5, 1),
            &Color::WHITE,
            BlendMode::Replace,
        )
        .expect("drawing should succeed");

    for x in 0..4 {
        assert_eq!(
            pixmap.pixel(x, 1).unwrap(),
            Color::WHITE,
            "the segment should be clamped to the visible row at column {}",
            x
        );
        assert_eq!(pixmap.pixel(x, 0).unwrap(), Color::BLACK);
        assert_eq!(pixmap.pixel(x, 2).unwrap(), Color::BLACK);
    }
}

#[test]
fn test_draw_segment_fully_outside_is_a_no_op() {
    let mut pixmap = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_segment(
            Point::new(-5, 0),
            Point::new(-1, 3),
            &Color::WHITE,
            BlendMode::Replace,
        )
        .expect("an invisible segment should not be an error");

    assert_eq!(
        pixmap.data(),
        &[0; 48][..],
        "nothing should have been painted"
    );
}

#[test]
fn test_draw_circle_radius_one_paints_the_ring() {
    let mut pixmap =
        Pixmap::<u8>::filled(4, 4, ChannelMode::Rgba, &Color::BLACK).expect("fill should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_circle(Point::new(2, 2), 1, &Color::WHITE, BlendMode::Replace)
        .expect("drawing should succeed");

    let ring = [
        (2, 1),
        (1, 2),
        (3, 2),
        (2, 3),
        (1, 1),
        (3, 1),
        (1, 3),
        (3, 3),
    ];

    for (x, y) in ring {
        assert_eq!(
            pixmap.pixel(x, y).unwrap(),
            Color::WHITE,
            "the ring should be painted at ({}, {})",
            x,
            y
        );
    }

    assert_eq!(
        pixmap.pixel(2, 2).unwrap(),
        Color::BLACK,
        "the center should stay black"
    );
    assert_eq!(pixmap.pixel(0, 0).unwrap(), Color::BLACK);
    assert_eq!(pixmap.pixel(2, 0).unwrap(), Color::BLACK);
}

#[test]
fn test_draw_circle_clips_at_the_border() {
    let mut pixmap = Pixmap::<u8>::new(3, 3, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_circle(Point::new(0, 0), 2, &Color::WHITE, BlendMode::Replace)
        .expect("drawing should succeed");

    assert_eq!(
        pixmap.pixel(2, 0).unwrap(),
        Color::WHITE,
        "the visible arc should be painted"
    );
    assert_eq!(
        pixmap.pixel(0, 2).unwrap(),
        Color::WHITE,
        "the visible arc should be painted"
    );
    assert_eq!(
        pixmap.pixel(1, 1).unwrap(),
        Color::BLACK,
        "the inside should stay black"
    );
}

#[test]
fn test_draw_square_outlines_the_rectangle() {
    let mut pixmap = Pixmap::<u8>::new(6, 6, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_square(Rect::new(1, 1, 4, 4), &Color::WHITE, BlendMode::Replace)
        .expect("drawing should succeed");

    for position in 1..5 {
        assert_eq!(pixmap.pixel(position, 1).unwrap(), Color::WHITE);
        assert_eq!(pixmap.pixel(position, 4).unwrap(), Color::WHITE);
        assert_eq!(pixmap.pixel(1, position).unwrap(), Color::WHITE);
        assert_eq!(pixmap.pixel(4, position).unwrap(), Color::WHITE);
    }

    assert_eq!(
        pixmap.pixel(2, 2).unwrap(),
        Color::BLACK,
        "the interior should stay black"
    );
    assert_eq!(
        pixmap.pixel(0, 0).unwrap(),
        Color::BLACK,
        "the outside should stay black"
    );
    assert_eq!(pixmap.pixel(5, 5).unwrap(), Color::BLACK);
}

#[test]
fn test_draw_cross_paints_both_diagonals() {
    let mut pixmap = Pixmap::<u8>::new(3, 3, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_cross(Rect::new(0, 0, 3, 3), &Color::WHITE, BlendMode::Replace)
        .expect("drawing should succeed");

    assert_eq!(pixmap.pixel(0, 0).unwrap(), Color::WHITE);
    assert_eq!(pixmap.pixel(1, 1).unwrap(), Color::WHITE);
    assert_eq!(pixmap.pixel(2, 2).unwrap(), Color::WHITE);
    assert_eq!(pixmap.pixel(0, 2).unwrap(), Color::WHITE);
    assert_eq!(pixmap.pixel(2, 0).unwrap(), Color::WHITE);

    assert_eq!(
        pixmap.pixel(1, 0).unwrap(),
        Color::BLACK,
        "edge midpoints should stay black"
    );
}

#[test]
fn test_draw_straight_cross_paints_middle_row_and_column() {
    let mut pixmap = Pixmap::<u8>::new(5, 5, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor
        .draw_straight_cross(Rect::new(0, 0, 5, 5), &Color::WHITE, BlendMode::Replace)
        .expect("drawing should succeed");

    for position in 0..5 {
        assert_eq!(pixmap.pixel(position, 2).unwrap(), Color::WHITE);
        assert_eq!(pixmap.pixel(2, position).unwrap(), Color::WHITE);
    }

    assert_eq!(pixmap.pixel(0, 0).unwrap(), Color::BLACK);
    assert_eq!(pixmap.pixel(4, 3).unwrap(), Color::BLACK);
}

#[test]
fn test_translate_moves_content_and_zeroes_the_rest() {
    let mut pixmap = Pixmap::<u8>::new(3, 3, ChannelMode::Rgb).expect("allocation should succeed");
    pixmap.set_pixel(0, 0, &Color::WHITE).unwrap();

    let mut processor = Processor::new(&mut pixmap);
    processor.translate(1, 1).expect("translation should succeed");

    assert_eq!(
        pixmap.pixel(1, 1).unwrap(),
        Color::WHITE,
        "content should move right and down"
    );
    assert_eq!(
        pixmap.pixel(0, 0).unwrap(),
        Color::BLACK,
        "the vacated origin should be zeroed"
    );
    assert_eq!(
        pixmap.updated_region(),
        Some(Rect::from_dimensions(3, 3)),
        "translation should mark the whole pixmap"
    );
}

#[test]
fn test_translate_full_offset_blanks_the_pixmap() {
    let mut pixmap =
        Pixmap::<u8>::filled(2, 2, ChannelMode::Rgb, &Color::WHITE).expect("fill should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor.translate(2, 0).expect("translation should succeed");

    assert_eq!(
        pixmap.data(),
        &[0; 12][..],
        "an offset reaching the width should blank everything"
    );
}

#[test]
fn test_translate_reuses_a_clean_scratch_buffer() {
    let mut pixmap = Pixmap::<u8>::new(1, 3, ChannelMode::Rgb).expect("allocation should succeed");
    pixmap.set_pixel(0, 0, &Color::WHITE).unwrap();

    let mut processor = Processor::new(&mut pixmap);
    processor.translate(0, 1).expect("translation should succeed");
    processor.translate(0, 1).expect("translation should succeed");

    assert_eq!(
        pixmap.pixel(0, 2).unwrap(),
        Color::WHITE,
        "content should have moved two rows down"
    );
    assert_eq!(
        pixmap.pixel(0, 0).unwrap(),
        Color::BLACK,
        "the scratch buffer must not leak the previous content"
    );
}

#[test]
fn test_shift_wraps_with_modular_offsets() {
    let mut pixmap = Pixmap::<u8>::new(3, 3, ChannelMode::Rgb).expect("allocation should succeed");
    pixmap.set_pixel(0, 0, &Color::RED).unwrap();

    let mut processor = Processor::new(&mut pixmap);
    processor.shift(4, 3).expect("shifting should succeed");

    assert_eq!(
        pixmap.pixel(1, 0).unwrap(),
        Color::RED,
        "offsets should reduce modulo the dimensions"
    );
    assert_eq!(pixmap.pixel(0, 0).unwrap(), Color::BLACK);
}

#[test]
fn test_shift_negative_wraps_backward() {
    let mut pixmap = Pixmap::<u8>::new(3, 3, ChannelMode::Rgb).expect("allocation should succeed");
    pixmap.set_pixel(0, 0, &Color::RED).unwrap();

    let mut processor = Processor::new(&mut pixmap);
    processor.shift(-1, -1).expect("shifting should succeed");

    assert_eq!(
        pixmap.pixel(2, 2).unwrap(),
        Color::RED,
        "a negative shift should wrap to the opposite corner"
    );
    assert_eq!(pixmap.pixel(0, 0).unwrap(), Color::BLACK);
}

#[test]
fn test_shift_preserves_every_pixel() {
    let mut pixmap = gray_3x2();

    let mut processor = Processor::new(&mut pixmap);
    processor.shift(1, 1).expect("shifting should succeed");

    let mut elements: Vec<u8> = pixmap.data().to_vec();
    elements.sort_unstable();

    assert_eq!(
        elements,
        vec![1, 2, 3, 4, 5, 6],
        "a wrapping shift should lose no data"
    );
}

#[test]
fn test_shift_text_area_scrolls_up() {
    let mut pixmap = Pixmap::<u8>::new(2, 4, ChannelMode::Rgb).expect("allocation should succeed");

    for x in 0..2 {
        pixmap.set_pixel(x, 0, &Color::RED).unwrap();
        pixmap.set_pixel(x, 1, &Color::GREEN).unwrap();
        pixmap.set_pixel(x, 2, &Color::BLUE).unwrap();
        pixmap.set_pixel(x, 3, &Color::WHITE).unwrap();
    }

    let mut processor = Processor::new(&mut pixmap);
    processor.shift_text_area(-1).expect("scrolling should succeed");

    assert_eq!(pixmap.pixel(0, 0).unwrap(), Color::GREEN);
    assert_eq!(pixmap.pixel(0, 1).unwrap(), Color::BLUE);
    assert_eq!(pixmap.pixel(0, 2).unwrap(), Color::WHITE);
    assert_eq!(
        pixmap.pixel(0, 3).unwrap(),
        Color::BLACK,
        "the freed bottom row should be zeroed"
    );
}

#[test]
fn test_shift_text_area_scrolls_down() {
    let mut pixmap = Pixmap::<u8>::new(2, 3, ChannelMode::Rgb).expect("allocation should succeed");

    for x in 0..2 {
        pixmap.set_pixel(x, 0, &Color::RED).unwrap();
        pixmap.set_pixel(x, 1, &Color::GREEN).unwrap();
        pixmap.set_pixel(x, 2, &Color::BLUE).unwrap();
    }

    let mut processor = Processor::new(&mut pixmap);
    processor.shift_text_area(2).expect("scrolling should succeed");

    assert_eq!(
        pixmap.pixel(0, 0).unwrap(),
        Color::BLACK,
        "the freed top rows should be zeroed"
    );
    assert_eq!(pixmap.pixel(0, 1).unwrap(), Color::BLACK);
    assert_eq!(pixmap.pixel(0, 2).unwrap(), Color::RED);
}

#[test]
fn test_shift_text_area_full_distance_blanks() {
    let mut pixmap =
        Pixmap::<u8>::filled(2, 2, ChannelMode::Rgb, &Color::WHITE).expect("fill should succeed");

    let mut processor = Processor::new(&mut pixmap);
    processor.shift_text_area(2).expect("scrolling should succeed");

    assert_eq!(pixmap.data(), &[0; 12][..]);
}

#[test]
fn test_blit_copies_a_block() {
    let source = rgb_corners_2x2();
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);
    processor
        .blit_to(&source, Rect::new(1, 1, 2, 2))
        .expect("blitting should succeed");

    assert_eq!(target.pixel(1, 1).unwrap(), Color::RED);
    assert_eq!(target.pixel(2, 1).unwrap(), Color::GREEN);
    assert_eq!(target.pixel(1, 2).unwrap(), Color::BLUE);
    assert_eq!(target.pixel(2, 2).unwrap(), Color::WHITE);
    assert_eq!(
        target.pixel(0, 0).unwrap(),
        Color::BLACK,
        "pixels outside the clip should stay black"
    );
    assert_eq!(
        target.updated_region(),
        Some(Rect::new(1, 1, 2, 2)),
        "the destination clip should be marked"
    );
}

#[test]
fn test_blit_rejects_channel_mode_mismatch() {
    let source = Pixmap::<u8>::new(2, 2, ChannelMode::Rgba).expect("allocation should succeed");
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);

    assert_eq!(
        processor.blit_full(&source),
        Err(Error::ChannelModeMismatch {
            expected: ChannelMode::Rgb,
            actual: ChannelMode::Rgba,
        })
    );
}

#[test]
fn test_blit_rejects_overflowing_clip() {
    let source = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);

    assert_eq!(
        processor.blit_to(&source, Rect::new(3, 3, 2, 2)),
        Err(Error::InvalidRegion {
            region: Rect::new(3, 3, 2, 2),
        })
    );
}

#[test]
fn test_blit_rejects_mismatched_clip_sizes() {
    let source = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);

    assert_eq!(
        processor.blit(&source, Rect::new(0, 0, 2, 2), Rect::new(0, 0, 2, 1)),
        Err(Error::RegionSizeMismatch {
            source: Rect::new(0, 0, 2, 2),
            destination: Rect::new(0, 0, 2, 1),
        })
    );
}

#[test]
fn test_copy_replace_matches_the_source() {
    let source = rgb_corners_2x2();
    let mut target = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);
    processor
        .copy_full(&source, BlendMode::Replace, 1.0)
        .expect("copying should succeed");

    assert_eq!(target.data(), source.data());
}

#[test]
fn test_copy_clips_an_overflowing_destination() {
    let source = rgb_corners_2x2();
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);
    processor
        .copy_to(&source, Rect::new(3, 3, 2, 2), BlendMode::Replace, 1.0)
        .expect("copying should succeed");

    assert_eq!(
        target.pixel(3, 3).unwrap(),
        Color::RED,
        "the overlapping corner should be painted"
    );
    assert_eq!(target.pixel(2, 3).unwrap(), Color::BLACK);
    assert_eq!(target.pixel(3, 2).unwrap(), Color::BLACK);
}

#[test]
fn test_copy_at_negative_position_trims_the_source() {
    let source = rgb_corners_2x2();
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);
    processor
        .copy_at(&source, -1, -1, BlendMode::Replace, 1.0)
        .expect("copying should succeed");

    assert_eq!(
        target.pixel(0, 0).unwrap(),
        Color::WHITE,
        "only the bottom-right source pixel should remain visible"
    );
    assert_eq!(target.pixel(1, 0).unwrap(), Color::BLACK);
    assert_eq!(target.pixel(0, 1).unwrap(), Color::BLACK);
}

#[test]
fn test_copy_at_entirely_outside_is_a_no_op() {
    let source = rgb_corners_2x2();
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);
    processor
        .copy_at(&source, -2, 0, BlendMode::Replace, 1.0)
        .expect("an invisible copy should not be an error");

    assert_eq!(target.data(), &[0; 48][..]);
}

#[test]
fn test_copy_color_blends_over_a_region() {
    let mut target = Pixmap::<u8>::new(4, 4, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);
    processor
        .copy_color(&Color::WHITE, Rect::new(1, 1, 2, 2), BlendMode::Normal, 0.5)
        .expect("copying should succeed");

    assert_eq!(
        target.pixel_element(1, 1, Channel::Red).unwrap(),
        128,
        "white at half opacity over black should yield mid grey"
    );
    assert_eq!(target.pixel_element(2, 2, Channel::Green).unwrap(), 128);
    assert_eq!(
        target.pixel_element(0, 0, Channel::Red).unwrap(),
        0,
        "pixels outside the clip should stay black"
    );
}

#[test]
fn test_stencil_respects_the_mask() {
    let source =
        Pixmap::<u8>::filled(2, 2, ChannelMode::Rgb, &Color::RED).expect("fill should succeed");
    let mask = Pixmap::<u8>::from_raw(2, 2, ChannelMode::Grayscale, vec![255, 0, 0, 255])
        .expect("construction should succeed");
    let mut target =
        Pixmap::<u8>::filled(2, 2, ChannelMode::Rgb, &Color::BLUE).expect("fill should succeed");

    let area = Rect::from_dimensions(2, 2);

    let mut processor = Processor::new(&mut target);
    processor
        .stencil(&source, area, area, &mask, BlendMode::Replace, 1.0)
        .expect("stencilling should succeed");

    assert_eq!(
        target.pixel(0, 0).unwrap(),
        Color::RED,
        "unmasked pixels should receive the source"
    );
    assert_eq!(target.pixel(1, 1).unwrap(), Color::RED);
    assert_eq!(
        target.pixel(1, 0).unwrap(),
        Color::BLUE,
        "masked pixels should keep the previous content"
    );
    assert_eq!(target.pixel(0, 1).unwrap(), Color::BLUE);
}

#[test]
fn test_stencil_rejects_a_colored_mask() {
    let source = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");
    let mask = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");
    let mut target = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");

    let area = Rect::from_dimensions(2, 2);

    let mut processor = Processor::new(&mut target);

    assert_eq!(
        processor.stencil(&source, area, area, &mask, BlendMode::Replace, 1.0),
        Err(Error::ChannelModeMismatch {
            expected: ChannelMode::Grayscale,
            actual: ChannelMode::Rgb,
        })
    );
}

#[test]
fn test_stencil_rejects_a_mismatched_mask_size() {
    let source = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");
    let mask = Pixmap::<u8>::new(1, 1, ChannelMode::Grayscale).expect("allocation should succeed");
    let mut target = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");

    let area = Rect::from_dimensions(2, 2);

    let mut processor = Processor::new(&mut target);

    assert_eq!(
        processor.stencil(&source, area, area, &mask, BlendMode::Replace, 1.0),
        Err(Error::SizeMismatch {
            expected: 4,
            actual: 1,
        })
    );
}

#[test]
fn test_stencil_color_paints_through_the_mask() {
    let mask = Pixmap::<u8>::from_raw(2, 2, ChannelMode::Grayscale, vec![255, 0, 0, 255])
        .expect("construction should succeed");
    let mut target = Pixmap::<u8>::new(2, 2, ChannelMode::Rgb).expect("allocation should succeed");

    let mut processor = Processor::new(&mut target);
    processor
        .stencil_color(
            &Color::WHITE,
            Rect::from_dimensions(2, 2),
            &mask,
            BlendMode::Replace,
            1.0,
        )
        .expect("stencilling should succeed");

    assert_eq!(target.pixel(0, 0).unwrap(), Color::WHITE);
    assert_eq!(target.pixel(1, 1).unwrap(), Color::WHITE);
    assert_eq!(target.pixel(1, 0).unwrap(), Color::BLACK);
}

#[test]
fn test_resize_identity_returns_a_clone() {
    let source = gray_3x2();

    let resized =
        Processor::resize(&source, 3, 2, FilteringMode::Linear).expect("resizing should succeed");

    assert_eq!(resized, source);
}

#[test]
fn test_resize_nearest_repeats_pixels() {
    let source = Pixmap::<u8>::from_raw(2, 1, ChannelMode::Rgb, vec![255, 0, 0, 0, 0, 255])
        .expect("construction should succeed");

    let resized =
        Processor::resize(&source, 4, 1, FilteringMode::Nearest).expect("resizing should succeed");

    assert_eq!(
        resized.data(),
        &[255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255][..],
        "each source pixel should cover two destination pixels"
    );
}

#[test]
fn test_resize_linear_interpolates_between_pixels() {
    let source = Pixmap::<u8>::from_raw(2, 1, ChannelMode::Grayscale, vec![0, 255])
        .expect("construction should succeed");

    let resized =
        Processor::resize(&source, 3, 1, FilteringMode::Linear).expect("resizing should succeed");

    assert_eq!(
        resized.data(),
        &[0, 85, 170][..],
        "the ramp should be sampled at thirds"
    );
}

#[test]
fn test_resize_cubic_preserves_flat_content() {
    let source = Pixmap::<u8>::from_raw(4, 4, ChannelMode::Rgb, vec![128; 48])
        .expect("construction should succeed");

    let resized =
        Processor::resize(&source, 2, 2, FilteringMode::Cubic).expect("resizing should succeed");

    assert_eq!(
        resized.data(),
        &[128; 12][..],
        "downsampling flat grey should stay flat"
    );
}

#[test]
fn test_resize_rejects_bad_input() {
    let invalid = Pixmap::<u8>::default();

    assert_eq!(
        Processor::resize(&invalid, 2, 2, FilteringMode::Nearest).unwrap_err(),
        Error::InvalidPixmap
    );

    let source = gray_3x2();

    assert_eq!(
        Processor::resize(&source, 0, 2, FilteringMode::Nearest).unwrap_err(),
        Error::InvalidDimensions {
            width: 0,
            height: 2,
        }
    );
}

#[test]
fn test_resize_by_ratio_truncates_dimensions() {
    let source = Pixmap::<u8>::new(3, 3, ChannelMode::Rgb).expect("allocation should succeed");

    let resized = Processor::resize_by_ratio(&source, 1.5, FilteringMode::Nearest)
        .expect("resizing should succeed");

    assert_eq!(resized.width(), 4, "4.5 should truncate to 4");
    assert_eq!(resized.height(), 4);
}

#[test]
fn test_crop_extracts_the_region() {
    let source = Pixmap::<u8>::from_raw(
        3,
        3,
        ChannelMode::Grayscale,
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
    )
    .expect("construction should succeed");

    let cropped = Processor::crop(&source, Rect::new(1, 1, 2, 2)).expect("cropping should succeed");

    assert_eq!(cropped.width(), 2);
    assert_eq!(cropped.height(), 2);
    assert_eq!(cropped.data(), &[5, 6, 8, 9][..]);
}

#[test]
fn test_crop_clamps_an_overflowing_rectangle() {
    let source = Pixmap::<u8>::from_raw(
        3,
        3,
        ChannelMode::Grayscale,
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
    )
    .expect("construction should succeed");

    let cropped = Processor::crop(&source, Rect::new(2, 2, 5, 5)).expect("cropping should succeed");

    assert_eq!(cropped.width(), 1);
    assert_eq!(cropped.height(), 1);
    assert_eq!(cropped.data(), &[9][..]);
}

#[test]
fn test_crop_rejects_a_rectangle_outside() {
    let source = gray_3x2();

    assert_eq!(
        Processor::crop(&source, Rect::new(3, 0, 1, 1)).unwrap_err(),
        Error::InvalidRegion {
            region: Rect::new(3, 0, 1, 1),
        }
    );
}

#[test]
fn test_extend_adds_solid_borders() {
    let source =
        Pixmap::<u8>::filled(2, 2, ChannelMode::Rgb, &Color::RED).expect("fill should succeed");

    let extended =
        Processor::extend(&source, [1, 2, 3, 4], &Color::BLUE).expect("extending should succeed");

    assert_eq!(extended.width(), 6, "width should grow by left and right");
    assert_eq!(extended.height(), 8, "height should grow by top and bottom");

    assert_eq!(
        extended.pixel(0, 0).unwrap(),
        Color::BLUE,
        "the border should carry the fill color"
    );
    assert_eq!(
        extended.pixel(1, 2).unwrap(),
        Color::RED,
        "the content should sit at the left and top offsets"
    );
    assert_eq!(extended.pixel(2, 3).unwrap(), Color::RED);
    assert_eq!(extended.pixel(3, 2).unwrap(), Color::BLUE);
    assert_eq!(extended.pixel(5, 7).unwrap(), Color::BLUE);
}

#[test]
fn test_mirror_x_flips_rows() {
    let mirrored = Processor::mirror(&gray_3x2(), MirrorMode::X).expect("mirroring should succeed");

    assert_eq!(mirrored.data(), &[4, 5, 6, 1, 2, 3][..]);
}

#[test]
fn test_mirror_y_flips_columns() {
    let mirrored = Processor::mirror(&gray_3x2(), MirrorMode::Y).expect("mirroring should succeed");

    assert_eq!(mirrored.data(), &[3, 2, 1, 6, 5, 4][..]);
}

#[test]
fn test_mirror_both_reverses_pixels() {
    let mirrored =
        Processor::mirror(&gray_3x2(), MirrorMode::Both).expect("mirroring should succeed");

    assert_eq!(mirrored.data(), &[6, 5, 4, 3, 2, 1][..]);
}

#[test]
fn test_mirror_twice_is_the_identity() {
    let source = gray_3x2();

    for mode in [MirrorMode::X, MirrorMode::Y, MirrorMode::Both] {
        let once = Processor::mirror(&source, mode).expect("mirroring should succeed");
        let twice = Processor::mirror(&once, mode).expect("mirroring should succeed");

        assert_eq!(twice, source, "mirroring twice with {:?} should restore", mode);
    }
}

#[test]
fn test_rotate_quarter_turn_is_clockwise() {
    let rotated = Processor::rotate_quarter_turn(&gray_3x2()).expect("rotation should succeed");

    assert_eq!(rotated.width(), 2, "dimensions should swap");
    assert_eq!(rotated.height(), 3);
    assert_eq!(rotated.data(), &[4, 1, 5, 2, 6, 3][..]);
}

#[test]
fn test_rotate_three_quarter_turn_is_counterclockwise() {
    let rotated =
        Processor::rotate_three_quarter_turn(&gray_3x2()).expect("rotation should succeed");

    assert_eq!(rotated.width(), 2);
    assert_eq!(rotated.height(), 3);
    assert_eq!(rotated.data(), &[3, 6, 2, 5, 1, 4][..]);
}

#[test]
fn test_rotate_half_turn_reverses_pixels() {
    let rotated = Processor::rotate_half_turn(&gray_3x2()).expect("rotation should succeed");

    assert_eq!(rotated.data(), &[6, 5, 4, 3, 2, 1][..]);

    let restored = Processor::rotate_half_turn(&rotated).expect("rotation should succeed");

    assert_eq!(restored, gray_3x2());
}

#[test]
fn test_four_quarter_turns_are_the_identity() {
    let source = gray_3x2();

    let mut rotated = source.clone();

    for _ in 0..4 {
        rotated = Processor::rotate_quarter_turn(&rotated).expect("rotation should succeed");
    }

    assert_eq!(rotated, source);
}

#[test]
fn test_quarter_then_three_quarter_restores() {
    let source = gray_3x2();

    let quarter = Processor::rotate_quarter_turn(&source).expect("rotation should succeed");
    let restored =
        Processor::rotate_three_quarter_turn(&quarter).expect("rotation should succeed");

    assert_eq!(restored, source);
}

#[test]
fn test_inverse_colors_preserves_alpha() {
    let source = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgba, vec![200, 100, 50, 128])
        .expect("construction should succeed");

    let inverted = Processor::inverse_colors(&source).expect("inversion should succeed");

    assert_eq!(
        inverted.data(),
        &[55, 155, 205, 128][..],
        "colors should invert while alpha stays"
    );
}

#[test]
fn test_inverse_colors_passes_grayscale_through() {
    let source = gray_3x2();

    let inverted = Processor::inverse_colors(&source).expect("inversion should succeed");

    assert_eq!(inverted, source);
}

#[test]
fn test_swap_channels_reverses_color_order() {
    let rgb = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgb, vec![10, 20, 30])
        .expect("construction should succeed");

    let swapped = Processor::swap_channels(&rgb, false).expect("swapping should succeed");

    assert_eq!(swapped.data(), &[30, 20, 10][..]);

    let rgba = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgba, vec![10, 20, 30, 40])
        .expect("construction should succeed");

    let swapped = Processor::swap_channels(&rgba, false).expect("swapping should succeed");

    assert_eq!(swapped.data(), &[30, 20, 10, 40][..], "alpha should stay put");

    let swapped = Processor::swap_channels(&rgba, true).expect("swapping should succeed");

    assert_eq!(
        swapped.data(),
        &[40, 30, 20, 10][..],
        "alpha should join the swap when asked"
    );
}

#[test]
fn test_add_alpha_channel_appends_opaque_values() {
    let rgb = Pixmap::<u8>::from_raw(2, 1, ChannelMode::Rgb, vec![1, 2, 3, 4, 5, 6])
        .expect("construction should succeed");

    let rgba = Processor::add_alpha_channel(&rgb).expect("conversion should succeed");

    assert_eq!(rgba.channel_mode(), ChannelMode::Rgba);
    assert_eq!(rgba.data(), &[1, 2, 3, 255, 4, 5, 6, 255][..]);

    let gray = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Grayscale, vec![7])
        .expect("construction should succeed");

    let with_alpha = Processor::add_alpha_channel(&gray).expect("conversion should succeed");

    assert_eq!(with_alpha.channel_mode(), ChannelMode::GrayscaleAlpha);
    assert_eq!(with_alpha.data(), &[7, 255][..]);
}

#[test]
fn test_remove_alpha_channel_restores_the_original() {
    let rgb = Pixmap::<u8>::from_raw(2, 1, ChannelMode::Rgb, vec![1, 2, 3, 4, 5, 6])
        .expect("construction should succeed");

    let rgba = Processor::add_alpha_channel(&rgb).expect("conversion should succeed");
    let restored = Processor::remove_alpha_channel(&rgba).expect("conversion should succeed");

    assert_eq!(restored, rgb);
}

#[test]
fn test_add_alpha_channel_passes_through_when_present() {
    let rgba = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgba, vec![1, 2, 3, 4])
        .expect("construction should succeed");

    let unchanged = Processor::add_alpha_channel(&rgba).expect("conversion should succeed");

    assert_eq!(unchanged, rgba);
}

#[test]
fn test_extract_channel_pulls_single_planes() {
    let rgb = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgb, vec![10, 20, 30])
        .expect("construction should succeed");

    for (channel, expected) in [
        (Channel::Red, 10),
        (Channel::Green, 20),
        (Channel::Blue, 30),
    ] {
        let plane = Processor::extract_channel(&rgb, channel).expect("extraction should succeed");

        assert_eq!(plane.channel_mode(), ChannelMode::Grayscale);
        assert_eq!(plane.data(), &[expected][..], "{:?} plane", channel);
    }
}

#[test]
fn test_extract_missing_alpha_yields_white() {
    let rgb = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgb, vec![10, 20, 30])
        .expect("construction should succeed");

    let plane = Processor::extract_channel(&rgb, Channel::Alpha).expect("extraction should succeed");

    assert_eq!(
        plane.data(),
        &[255][..],
        "layouts without alpha are implicitly opaque"
    );
}

#[test]
fn test_extract_channel_from_grayscale_alpha() {
    let source = Pixmap::<u8>::from_raw(1, 1, ChannelMode::GrayscaleAlpha, vec![77, 128])
        .expect("construction should succeed");

    let gray = Processor::extract_channel(&source, Channel::Red).expect("extraction should succeed");

    assert_eq!(gray.data(), &[77][..]);

    let alpha =
        Processor::extract_channel(&source, Channel::Alpha).expect("extraction should succeed");

    assert_eq!(alpha.data(), &[128][..]);
}

#[test]
fn test_to_grayscale_uses_the_luminance_formula() {
    let red =
        Pixmap::<u8>::filled(1, 1, ChannelMode::Rgb, &Color::RED).expect("fill should succeed");

    let gray = Processor::to_grayscale(&red, GrayscaleMode::LumaRec709, 0)
        .expect("conversion should succeed");

    assert_eq!(gray.channel_mode(), ChannelMode::Grayscale);
    assert_eq!(
        gray.data(),
        &[54][..],
        "pure red should map to its Rec. 709 weight"
    );
}

#[test]
fn test_to_rgb_replicates_gray_values() {
    let gray = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Grayscale, vec![100])
        .expect("construction should succeed");

    let rgb = Processor::to_rgb(&gray).expect("conversion should succeed");

    assert_eq!(rgb.channel_mode(), ChannelMode::Rgb);
    assert_eq!(rgb.data(), &[100, 100, 100][..]);

    let rgba = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgba, vec![1, 2, 3, 4])
        .expect("construction should succeed");

    let stripped = Processor::to_rgb(&rgba).expect("conversion should succeed");

    assert_eq!(stripped.data(), &[1, 2, 3][..], "alpha should be dropped");
}

#[test]
fn test_to_rgba_applies_the_requested_opacity() {
    let rgb = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgb, vec![10, 20, 30])
        .expect("construction should succeed");

    let rgba = Processor::to_rgba(&rgb, 0.5).expect("conversion should succeed");

    assert_eq!(rgba.channel_mode(), ChannelMode::Rgba);
    assert_eq!(rgba.data(), &[10, 20, 30, 128][..]);

    let existing = Pixmap::<u8>::from_raw(1, 1, ChannelMode::Rgba, vec![1, 2, 3, 4])
        .expect("construction should succeed");

    let unchanged = Processor::to_rgba(&existing, 0.5).expect("conversion should succeed");

    assert_eq!(
        unchanged.data(),
        &[1, 2, 3, 4][..],
        "existing alpha should be kept on passthrough"
    );
}
