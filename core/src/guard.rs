//! Guard composition for transition eligibility.
//!
//! A guard is an explicit ordered list of boolean predicates over
//! `(event payload, context)`. All predicates must hold for the transition
//! to be taken; the first failing predicate drops the event silently — no
//! state change, no error recorded. Guards gate *eligibility*, not
//! validation: a refused event is indistinguishable from one that was never
//! sent.

use smallvec::SmallVec;

/// A single guard predicate over `(event payload, context)`.
pub type Predicate<Input, Context> = fn(&Input, &Context) -> bool;

/// An ordered conjunction of guard predicates.
///
/// # Example
///
/// ```
/// use todoflow_core::guard::Guard;
///
/// struct Ctx;
///
/// fn non_empty(text: &String, _ctx: &Ctx) -> bool {
///     !text.trim().is_empty()
/// }
///
/// let guard: Guard<String, Ctx> = Guard::all([non_empty as fn(&String, &Ctx) -> bool]);
/// assert!(guard.check(&"buy milk".to_string(), &Ctx));
/// assert!(!guard.check(&"   ".to_string(), &Ctx));
/// ```
pub struct Guard<Input, Context> {
    predicates: SmallVec<[Predicate<Input, Context>; 2]>,
}

impl<Input, Context> Guard<Input, Context> {
    /// Build a guard from an ordered list of predicates.
    #[must_use]
    pub fn all(predicates: impl IntoIterator<Item = Predicate<Input, Context>>) -> Self {
        Self {
            predicates: predicates.into_iter().collect(),
        }
    }

    /// A guard with no predicates; always passes.
    #[must_use]
    pub fn always() -> Self {
        Self {
            predicates: SmallVec::new(),
        }
    }

    /// Evaluate the predicates in order; `false` on the first failure.
    #[must_use]
    pub fn check(&self, input: &Input, context: &Context) -> bool {
        self.predicates.iter().all(|p| p(input, context))
    }
}

impl<Input, Context> std::fmt::Debug for Guard<Input, Context> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        armed: bool,
    }

    fn input_positive(n: &i32, _ctx: &Ctx) -> bool {
        *n > 0
    }

    fn context_armed(_n: &i32, ctx: &Ctx) -> bool {
        ctx.armed
    }

    #[test]
    fn all_predicates_must_hold() {
        let guard = Guard::all([
            input_positive as Predicate<i32, Ctx>,
            context_armed as Predicate<i32, Ctx>,
        ]);

        assert!(guard.check(&1, &Ctx { armed: true }));
        assert!(!guard.check(&1, &Ctx { armed: false }));
        assert!(!guard.check(&-1, &Ctx { armed: true }));
    }

    #[test]
    fn empty_guard_always_passes() {
        let guard: Guard<i32, Ctx> = Guard::always();
        assert!(guard.check(&0, &Ctx { armed: false }));
    }
}
