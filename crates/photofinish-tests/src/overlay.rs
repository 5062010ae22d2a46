//! Integration tests for overlay compositing and export output.
//!
//! The contract under test: the exported still shows the finish line at
//! exactly the pixels the operator saw during interactive placement.

use photofinish_core::{
    geometry::DEFAULT_MARGIN_FRACTION, FinishLinePlacement, FrameImage, PixelPoint, SurfaceOrigin,
};
use photofinish_overlay::{LineStyle, OverlayCompositor};

// ── Coordinate identity ────────────────────────────────────────

#[test]
fn interactive_and_exported_endpoints_agree() {
    crate::init_test_logging();
    let placement = FinishLinePlacement::new(0.25, 0.75);

    // What the interactive overlay computes for its handles...
    let preview = placement.endpoints(1920, 1080, DEFAULT_MARGIN_FRACTION);
    assert_eq!(preview.top, PixelPoint::new(480, 108));
    assert_eq!(preview.bottom, PixelPoint::new(1440, 972));

    // ...is exactly where the compositor paints them.
    let out = OverlayCompositor::new()
        .composite(&FrameImage::black(1920, 1080), placement)
        .unwrap();
    assert_eq!(out.get_pixel(480, 108).0, [255, 59, 48]);
    assert_eq!(out.get_pixel(1440, 972).0, [255, 59, 48]);

    // And the top handle is in the visual top of the image — the
    // historical failure mode put it 972 rows down.
    assert_eq!(out.get_pixel(480, 972).0, [0, 0, 0]);
}

#[test]
fn y_flip_is_isolated_and_consistent() {
    // If a bottom-up surface were ever used, the flip maps the same UI
    // row to the mirrored buffer row, and only the flip does.
    let ui_top_row = 108;
    assert_eq!(SurfaceOrigin::TopLeft.to_buffer_y(ui_top_row, 1080), 108);
    assert_eq!(SurfaceOrigin::BottomLeft.to_buffer_y(ui_top_row, 1080), 971);

    let p = PixelPoint::new(480, 108);
    assert_eq!(
        SurfaceOrigin::BottomLeft.to_buffer_point(p, 1080),
        PixelPoint::new(480, 971)
    );
}

#[test]
fn same_placement_scales_with_resolution() {
    let placement = FinishLinePlacement::new(0.25, 0.75);
    let compositor = OverlayCompositor::new();

    for (w, h) in [(1280u32, 720u32), (3840, 2160)] {
        let out = compositor.composite(&FrameImage::black(w, h), placement).unwrap();
        let ep = placement.endpoints(w, h, DEFAULT_MARGIN_FRACTION);
        assert_eq!(out.get_pixel(ep.top.x as u32, ep.top.y as u32).0, [255, 59, 48]);
        assert_eq!(
            out.get_pixel(ep.bottom.x as u32, ep.bottom.y as u32).0,
            [255, 59, 48]
        );
    }
}

// ── Export encoding ────────────────────────────────────────────

#[test]
fn exported_jpeg_keeps_the_line_visible() {
    let placement = FinishLinePlacement::new(0.25, 0.75);
    let bytes = OverlayCompositor::new()
        .composite_to_jpeg(&FrameImage::black(1920, 1080), placement)
        .unwrap();

    // Decode the lossy output and check the handle pixels are still
    // unmistakably the line color against the black frame.
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (1920, 1080));
    for (x, y) in [(480u32, 108u32), (1440, 972)] {
        let [r, g, b] = decoded.get_pixel(x, y).0;
        assert!(r > 150, "line lost at ({x},{y}): r={r} g={g} b={b}");
        assert!(g < 120 && b < 120, "line discolored at ({x},{y})");
    }
}

#[test]
fn custom_style_is_applied() {
    let style = LineStyle {
        color: [0, 255, 0],
        handle_radius_px: 3,
    };
    let out = OverlayCompositor::new()
        .with_style(style)
        .composite(&FrameImage::black(640, 360), FinishLinePlacement::new(0.5, 0.5))
        .unwrap();

    // Handle center at (320, 36) with the 10% margin.
    assert_eq!(out.get_pixel(320, 36).0, [0, 255, 0]);
}
