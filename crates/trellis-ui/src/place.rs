use trellis_core::*;
use web_time::Instant;

use crate::control::{Control, ControlBase};
use crate::runtime::PassContext;

impl ControlBase {
    /// Static user transform, or the transform-change animator's value while
    /// it runs. The visibility animation's matrix is applied on top.
    fn resolve_user_transform(&mut self, now: Instant) -> Matrix {
        let target = self.transform();
        let mut user = target;
        if let Some(anim) = self.animators.transform.as_mut() {
            if target != self.last_user_transform {
                let before = if anim.is_running() {
                    anim.current().matrix
                } else {
                    self.last_user_transform
                };
                anim.set_before(AnimatorState::with_matrix(before));
                anim.set_after(AnimatorState::with_matrix(target));
                anim.restart(now);
            }
            if anim.is_running() {
                if anim.update(now) {
                    self.measure_requested = true;
                }
                user = anim.current().matrix;
            }
        }
        self.last_user_transform = target;

        if let Some(vis) = self.animators.visibility_running() {
            user = vis.current().matrix.then(&user);
        }
        user
    }

    /// Parent-supplied transform, eased by the move animator when it changes.
    fn resolve_move(&mut self, local: Matrix, now: Instant) -> Matrix {
        let suppress = std::mem::take(&mut self.suppress_next_animation);
        let first = self.last_parent_local.is_none();
        let changed = self.last_parent_local != Some(local);
        self.last_parent_local = Some(local);

        let Some(anim) = self.animators.movement.as_mut() else {
            self.last_move = local;
            return local;
        };

        if changed {
            anim.set_after(AnimatorState::with_matrix(local));
            if suppress || first {
                anim.stop();
            } else {
                let before = if anim.is_running() {
                    anim.current().matrix
                } else {
                    self.last_move
                };
                anim.set_before(AnimatorState::with_matrix(before));
                anim.restart(now);
            }
        } else if suppress {
            anim.stop();
        }

        let applied = if anim.is_running() {
            if anim.update(now) {
                self.measure_requested = true;
            }
            anim.current().matrix
        } else {
            local
        };
        self.last_move = applied;
        applied
    }
}

impl Control {
    /// Composes this control's local transform from the parent-supplied
    /// `local` (box space to parent space) and places the subtree.
    ///
    /// Order: move to the inner origin, scale, user transform, move
    /// animation, move back.
    pub fn place(&mut self, local: Matrix, ancestral: &Matrix, cx: &PassContext) {
        let (base, widget) = self.parts_mut();
        let boundary = base.boundary();
        let origin = boundary.left_top() + boundary.size().to_vec2().mul_elem(base.inner_origin());

        let user = base.resolve_user_transform(cx.now);
        let moved = base.resolve_move(local, cx.now);
        let composed = Matrix::translation(-origin)
            .then(&Matrix::uniform_scale(base.scale()))
            .then(&user)
            .then(&moved)
            .then(&Matrix::translation(origin));

        base.local_transform = if composed.is_finite() {
            composed
        } else {
            log::warn!("{:?} produced a non-finite transform; using parent placement", base.id());
            moved
        };
        base.full_transform = base.local_transform.then(ancestral);

        let full = base.full_transform;
        let origin = Matrix::translation(base.interactive_box().left_top());
        let state = base.visual_state;
        let incoming = base.backgrounds.incoming().matrix.then(&origin);
        if let Some(bg) = base.backgrounds.for_state_mut(state) {
            bg.place(incoming, &full, cx);
        }
        let outgoing = base.backgrounds.outgoing().matrix.then(&origin);
        if let Some(bg) = base.backgrounds.outgoing_mut(state) {
            bg.place(outgoing, &full, cx);
        }
        widget.place_children(base, cx);
    }

    /// Runs widget timers bottom-up.
    pub fn tick(&mut self, cx: &PassContext) {
        for child in self.children_mut() {
            child.tick(cx);
        }
        let (base, widget) = self.parts_mut();
        widget.tick(base, cx);
    }
}
