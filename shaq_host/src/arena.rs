//! Reset-on-reload bump allocator for session-scoped text (spec §3 Lifecycles, §9).
//!
//! Every source-text copy an [`shaq_sel::ast::Ast`]/[`shaq_sel::codegen::ExeExpr`] borrows from
//! (string literals, identifier spans) is copied into a [`SessionArena`] first, so those borrows
//! stay valid for exactly as long as the project that produced them is loaded. `bumpalo` is the
//! teacher's own bump-allocator dependency (`game_render`'s per-frame command encoding uses it for
//! the same reason: cheap, reset-in-bulk, no per-object free).

use bumpalo::Bump;

#[derive(Default)]
pub struct SessionArena {
    bump: Bump,
}

impl SessionArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Copies `s` into the arena and returns a borrow valid for as long as this arena isn't reset.
    pub fn alloc_str<'a>(&'a self, s: &str) -> &'a str {
        self.bump.alloc_str(s)
    }

    /// Watermark-resets the arena, invalidating every borrow handed out since the last reset.
    /// Called on project reload (spec §3 Lifecycles); callers are responsible for dropping every
    /// `Ast`/`ExeExpr` that borrowed from this arena before calling this.
    pub fn reset(&mut self) {
        self.bump.reset();
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_str_round_trips() {
        let arena = SessionArena::new();
        let s = arena.alloc_str("hello");
        assert_eq!(s, "hello");
    }

    #[test]
    fn reset_reclaims_capacity() {
        let mut arena = SessionArena::new();
        for _ in 0..64 {
            arena.alloc_str("some reasonably sized source text to allocate");
        }
        let used = arena.allocated_bytes();
        arena.reset();
        // After reset the watermark is back to empty; the next allocation reuses the same chunk.
        arena.alloc_str("x");
        assert!(arena.allocated_bytes() <= used);
    }
}
