//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::resize::Anchor;

/// Fill in a missing edge from the source aspect ratio.
///
/// A zero `width` or `height` means "follow the other edge". When both are
/// zero the source dimensions are returned unchanged. Results are never
/// smaller than 1px.
///
/// # Examples
/// ```
/// # use imgstage::imaging::complete_dimensions;
/// // 2000x1000 source, width 500 requested → 500x250
/// assert_eq!(complete_dimensions((2000, 1000), 500, 0), (500, 250));
/// ```
pub fn complete_dimensions(source: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let aspect = src_w as f64 / src_h.max(1) as f64;

    let (w, h) = match (width, height) {
        (0, 0) => (src_w, src_h),
        (0, h) => ((h as f64 * aspect).round() as u32, h),
        (w, 0) => (w, (w as f64 / aspect).round() as u32),
        (w, h) => (w, h),
    };
    (w.max(1), h.max(1))
}

/// Grow or shrink one edge by a `1/ratio` fraction of itself.
///
/// `ratio = 4` on a 1000px edge gives 1250 when growing and 750 when
/// shrinking. Integer division, never below 1px.
pub fn scale_edge(edge: u32, ratio: u32, grow: bool) -> u32 {
    if ratio == 0 {
        return edge.max(1);
    }
    let delta = edge / ratio;
    let scaled = if grow {
        edge.saturating_add(delta)
    } else {
        edge.saturating_sub(delta)
    };
    scaled.max(1)
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w.max(tgt_w), h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h.max(tgt_h))
    }
}

/// Top-left corner of a `target` crop inside a `fill` image, placed at `anchor`.
pub fn anchor_offset(fill: (u32, u32), target: (u32, u32), anchor: Anchor) -> (u32, u32) {
    let spare_x = fill.0.saturating_sub(target.0);
    let spare_y = fill.1.saturating_sub(target.1);

    let x = match anchor {
        Anchor::TopLeft | Anchor::Left | Anchor::BottomLeft => 0,
        Anchor::Top | Anchor::Center | Anchor::Bottom => spare_x / 2,
        Anchor::TopRight | Anchor::Right | Anchor::BottomRight => spare_x,
    };
    let y = match anchor {
        Anchor::TopLeft | Anchor::Top | Anchor::TopRight => 0,
        Anchor::Left | Anchor::Center | Anchor::Right => spare_y / 2,
        Anchor::BottomLeft | Anchor::Bottom | Anchor::BottomRight => spare_y,
    };
    (x, y)
}
