use trellis_core::*;

use crate::control::{Control, Dimension, MeasuredBoxes};
use crate::runtime::PassContext;

/// Space offered to the content on one axis.
fn offer_axis(dim: Dimension, available: f32, inset: f32) -> f32 {
    match dim {
        Dimension::WrapContent => f32::INFINITY,
        Dimension::MatchParent if available.is_finite() => (available - inset).max(0.0),
        Dimension::MatchParent => f32::INFINITY,
        Dimension::Fixed(v) => (v - inset).max(0.0),
    }
}

/// Content extent limits on one axis from min-size and max-size.
fn limits_axis(min: Dimension, max: Dimension, available: f32, inset: f32) -> (f32, f32) {
    let resolve = |d: Dimension, unbounded: f32| match d {
        Dimension::Fixed(v) => (v - inset).max(0.0),
        Dimension::MatchParent if available.is_finite() => (available - inset).max(0.0),
        _ => unbounded,
    };
    let lo = resolve(min, 0.0);
    let hi = resolve(max, f32::INFINITY);
    (lo, hi.max(lo))
}

fn clamp_offer(v: f32, (lo, hi): (f32, f32)) -> f32 {
    if v.is_finite() { v.clamp(lo, hi) } else { v }
}

fn sanitize_offer(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.max(0.0) }
}

/// Shrinks `adj` so that no edge pair crosses: the content box may collapse
/// to zero but never invert, which keeps the four boxes nested.
fn limit_adjustment(adj: Insets, content: &BoxRect) -> Insets {
    if !adj.is_finite() {
        return Insets::ZERO;
    }
    let fit = |a: f32, b: f32, extent: f32| {
        let total = a + b;
        if total >= -extent {
            (a, b)
        } else {
            let k = -extent / total;
            (a * k, b * k)
        }
    };
    let (left, right) = fit(adj.left, adj.right, content.width());
    let (top, bottom) = fit(adj.top, adj.bottom, content.height());
    Insets::new(left, top, right, bottom)
}

impl Control {
    /// Resolves the four measured boxes for the space `offered` by the parent
    /// (parent units; an infinite axis wraps to content) and returns the
    /// boundary box.
    ///
    /// Skipped when nothing asked for a measure and the offer is unchanged.
    pub fn measure(&mut self, offered: Size, cx: &PassContext) -> BoxRect {
        if !self.needs_measure() && self.base.last_offered == Some(offered) {
            return self.base.boxes.boundary;
        }
        let id = self.id();
        let (base, widget) = self.parts_mut();
        base.measure_requested = false;
        base.last_offered = Some(offered);

        let render_scale = base.render_scale();
        let available = Size::new(
            sanitize_offer(offered.width) * render_scale,
            sanitize_offer(offered.height) * render_scale,
        );

        let margin = base.margin();
        let padding = base.padding();
        let inset = margin + padding;
        let size = base.size();
        let limits_w = limits_axis(
            base.min_size().width,
            base.max_size().width,
            available.width,
            inset.horizontal(),
        );
        let limits_h = limits_axis(
            base.min_size().height,
            base.max_size().height,
            available.height,
            inset.vertical(),
        );

        let mut boxes = if render_scale > 0.0 {
            let offer = Size::new(
                clamp_offer(offer_axis(size.width, available.width, inset.horizontal()), limits_w),
                clamp_offer(offer_axis(size.height, available.height, inset.vertical()), limits_h),
            );
            let raw = widget.measure_content(base, offer, cx).normalize();
            let content = BoxRect::new(
                raw.left,
                raw.top,
                raw.left + raw.width().clamp(limits_w.0, limits_w.1),
                raw.top + raw.height().clamp(limits_h.0, limits_h.1),
            )
            .translate(inset.left_top());

            let interactive = content.expand(padding);
            let boundary = interactive.expand(margin);
            let outside = boundary.expand(base.extend_outside());
            MeasuredBoxes {
                outside,
                boundary,
                interactive,
                content,
            }
            .map(BoxRect::normalize)
        } else {
            MeasuredBoxes::default()
        };

        let visible = base.is_visible();
        match base.last_visible {
            Some(was) if was != visible => {
                log::debug!("{id:?} visibility -> {visible}");
                base.animators.on_visibility_toggled(visible, cx.now);
            }
            _ => {}
        }
        base.last_visible = Some(visible);

        if let Some(anim) = base.animators.visibility_running_mut() {
            if anim.update(cx.now) {
                let frac = anim.current().box_adjust;
                let extent = boxes.boundary.size();
                let adj = Insets::new(
                    frac.left * extent.width,
                    frac.top * extent.height,
                    frac.right * extent.width,
                    frac.bottom * extent.height,
                );
                let adj = limit_adjustment(adj, &boxes.content);
                boxes = boxes.map(|b| b.expand(adj));
            }
            // Keep measuring while the visibility animation runs.
            base.measure_requested = true;
        }
        base.boxes = boxes;

        let state = base.visual_state;
        if base.backgrounds.update(cx.now) {
            base.measure_requested = true;
        }
        let extent = boxes.interactive.size();
        if let Some(bg) = base.backgrounds.for_state_mut(state) {
            bg.measure(extent, cx);
        }
        if let Some(bg) = base.backgrounds.outgoing_mut(state) {
            bg.measure(extent, cx);
        }
        boxes.boundary
    }
}
