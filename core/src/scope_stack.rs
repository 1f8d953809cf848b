//! Lexical scope chains stored in an arena of frames.
//!
//! Each frame holds its own bindings and the id of its parent frame. Lookups
//! and reassignments walk the parent links; declarations only touch the frame
//! they name. Frames are addressed by [`ScopeId`] rather than by reference,
//! so a function value can hold on to its defining scope without creating
//! reference cycles:
//!
//! ```text
//! my x = true        # frame 0 (root): print, x
//! my f = do() {      # closure captures frame 0
//!   return x         # call frame 1 -> parent 0
//! }
//! ```
//!
//! A popped frame is released at once unless a closure captured it or one of
//! its descendants. Captured frames stay until [`ScopeArena::collect`] finds
//! that nothing refers to them any more. Released slots are reused by later
//! pushes.

use hashbrown::HashMap;
use thiserror::Error;

/// Address of a frame in a [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The global frame, created with the arena and never reclaimed.
    pub const ROOT: ScopeId = ScopeId(0);
}

/// Bound values that may keep a frame alive.
pub trait Capture {
    /// The frame this value closes over, if any.
    fn captured(&self) -> Option<ScopeId>;
}

/// Dead captured frames tolerated before a collection is due.
const MIN_COLLECT_AT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    Live,
    /// Popped, but captured; waiting for a collection.
    Dead,
    /// Slot available for reuse.
    Free,
}

struct Frame<'a, T> {
    parent: Option<ScopeId>,
    bindings: HashMap<&'a str, T>,
    state: FrameState,
    captured: bool,
}

impl<'a, T> Frame<'a, T> {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            bindings: HashMap::new(),
            state: FrameState::Live,
            captured: false,
        }
    }
}

/// Arena of scope frames. `T` is the bound value type.
pub struct ScopeArena<'a, T> {
    frames: Vec<Frame<'a, T>>,
    free: Vec<ScopeId>,
    in_use: usize,
    dead_captured: usize,
    collect_at: usize,
}

impl<'a, T: Copy> Default for ScopeArena<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Copy> ScopeArena<'a, T> {
    /// Create an arena holding only the root frame.
    pub fn new() -> Self {
        let mut root = Frame::new(None);
        root.captured = true;
        Self {
            frames: vec![root],
            free: Vec::new(),
            in_use: 1,
            dead_captured: 0,
            collect_at: MIN_COLLECT_AT,
        }
    }

    /// Open a child frame of `parent`.
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        debug_assert!(
            self.frames[parent.0].state != FrameState::Free,
            "parent frame was reclaimed"
        );
        let id = match self.free.pop() {
            Some(id) => {
                let frame = &mut self.frames[id.0];
                frame.parent = Some(parent);
                frame.state = FrameState::Live;
                id
            }
            None => {
                self.frames.push(Frame::new(Some(parent)));
                ScopeId(self.frames.len() - 1)
            }
        };
        self.in_use += 1;
        tracing::trace!(scope = id.0, parent = parent.0, "push scope");
        id
    }

    /// Close a frame. It is released unless it was captured; the root frame
    /// never is.
    pub fn pop(&mut self, id: ScopeId) {
        if id == ScopeId::ROOT {
            return;
        }
        let frame = &mut self.frames[id.0];
        if frame.state != FrameState::Live {
            return;
        }
        if frame.captured {
            frame.state = FrameState::Dead;
            self.dead_captured += 1;
        } else {
            self.release(id);
        }
        tracing::trace!(scope = id.0, frames = self.in_use, "pop scope");
    }

    fn release(&mut self, id: ScopeId) {
        let frame = &mut self.frames[id.0];
        frame.bindings.clear();
        frame.parent = None;
        frame.state = FrameState::Free;
        frame.captured = false;
        self.free.push(id);
        self.in_use -= 1;
    }

    /// Mark a frame as closed over. Its ancestors are marked too, since
    /// lookups through the closure walk them.
    pub fn capture(&mut self, id: ScopeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let frame = &mut self.frames[id.0];
            if frame.captured {
                break;
            }
            frame.captured = true;
            current = frame.parent;
        }
    }

    /// Look up a name from `id` outwards.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<&T> {
        let mut current = Some(id);
        while let Some(id) = current {
            let frame = &self.frames[id.0];
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            current = frame.parent;
        }
        None
    }

    /// Whether `name` is bound in frame `id` itself (parents are not searched).
    pub fn is_declared_here(&self, id: ScopeId, name: &str) -> bool {
        self.frames[id.0].bindings.contains_key(name)
    }

    /// Bind a new name in frame `id`. Fails if the frame already binds it;
    /// shadowing a name from an outer frame is allowed.
    pub fn declare(&mut self, id: ScopeId, name: &'a str, value: T) -> Result<(), ScopeError> {
        let bindings = &mut self.frames[id.0].bindings;
        if bindings.contains_key(name) {
            return Err(ScopeError::AlreadyDefined(name.to_string()));
        }
        bindings.insert(name, value);
        Ok(())
    }

    /// Overwrite the nearest existing binding of `name`, in whichever frame
    /// of the chain defines it.
    pub fn reassign(&mut self, id: ScopeId, name: &str, value: T) -> Result<(), ScopeError> {
        let mut current = Some(id);
        while let Some(id) = current {
            let frame = &mut self.frames[id.0];
            if let Some(slot) = frame.bindings.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            current = frame.parent;
        }
        Err(ScopeError::Undefined(name.to_string()))
    }

    /// Number of frames currently held (live, or dead but captured).
    pub fn frame_count(&self) -> usize {
        self.in_use
    }

    /// Whether enough captured frames have died to make [`collect`] worth it.
    ///
    /// [`collect`]: ScopeArena::collect
    pub fn needs_collection(&self) -> bool {
        self.dead_captured >= self.collect_at
    }

    /// Names bound directly in frame `id`, in no particular order.
    pub fn names(&self, id: ScopeId) -> impl Iterator<Item = &'a str> + '_ {
        self.frames[id.0].bindings.keys().copied()
    }
}

impl<'a, T: Copy + Capture> ScopeArena<'a, T> {
    /// Release every dead frame that is unreachable from the live frames and
    /// from `roots`. Reachability follows parent links and the frames that
    /// bound values capture.
    ///
    /// `roots` must name every frame captured by a value the caller still
    /// holds outside the arena.
    pub fn collect(&mut self, roots: impl IntoIterator<Item = ScopeId>) {
        let mut marked = vec![false; self.frames.len()];
        let mut pending: Vec<ScopeId> = roots.into_iter().collect();
        pending.extend(
            self.frames
                .iter()
                .enumerate()
                .filter(|(_, frame)| frame.state == FrameState::Live)
                .map(|(index, _)| ScopeId(index)),
        );

        while let Some(id) = pending.pop() {
            let frame = &self.frames[id.0];
            if marked[id.0] || frame.state == FrameState::Free {
                continue;
            }
            marked[id.0] = true;
            pending.extend(frame.parent);
            pending.extend(frame.bindings.values().filter_map(|value| value.captured()));
        }

        let mut kept = 0;
        let mut reclaimed = 0;
        for index in 0..self.frames.len() {
            if self.frames[index].state != FrameState::Dead {
                continue;
            }
            if marked[index] {
                kept += 1;
            } else {
                self.release(ScopeId(index));
                reclaimed += 1;
            }
        }
        self.dead_captured = kept;
        self.collect_at = MIN_COLLECT_AT.max(2 * kept);
        tracing::debug!(reclaimed, kept, frames = self.in_use, "collected scopes");
    }
}

/// Error from declaring or reassigning a name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The name is already bound in the target frame.
    #[error("{0} is already defined")]
    AlreadyDefined(String),
    /// No frame in the chain binds the name.
    #[error("{0} is undefined")]
    Undefined(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Slot {
        Plain,
        Closure(ScopeId),
    }

    impl Capture for Slot {
        fn captured(&self) -> Option<ScopeId> {
            match self {
                Slot::Plain => None,
                Slot::Closure(scope) => Some(*scope),
            }
        }
    }

    #[test]
    fn test_root_lookup() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "a", 1).unwrap();
        assert_eq!(scopes.lookup(ScopeId::ROOT, "a"), Some(&1));
        assert_eq!(scopes.lookup(ScopeId::ROOT, "b"), None);
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "a", 1).unwrap();
        let child = scopes.push(ScopeId::ROOT);
        let grandchild = scopes.push(child);
        scopes.declare(child, "b", 2).unwrap();

        assert_eq!(scopes.lookup(grandchild, "a"), Some(&1));
        assert_eq!(scopes.lookup(grandchild, "b"), Some(&2));
        assert_eq!(scopes.lookup(ScopeId::ROOT, "b"), None);
    }

    #[test]
    fn test_shadowing() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "a", 1).unwrap();
        let child = scopes.push(ScopeId::ROOT);
        scopes.declare(child, "a", 10).unwrap();

        assert_eq!(scopes.lookup(child, "a"), Some(&10));
        scopes.pop(child);
        assert_eq!(scopes.lookup(ScopeId::ROOT, "a"), Some(&1));
    }

    #[test]
    fn test_declare_twice_in_same_frame_fails() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "x", true).unwrap();
        assert_eq!(
            scopes.declare(ScopeId::ROOT, "x", false),
            Err(ScopeError::AlreadyDefined("x".to_string()))
        );
        assert_eq!(scopes.lookup(ScopeId::ROOT, "x"), Some(&true));
    }

    #[test]
    fn test_reassign_targets_defining_frame() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "x", 1).unwrap();
        let child = scopes.push(ScopeId::ROOT);

        scopes.reassign(child, "x", 2).unwrap();
        assert!(!scopes.is_declared_here(child, "x"));
        scopes.pop(child);
        assert_eq!(scopes.lookup(ScopeId::ROOT, "x"), Some(&2));
    }

    #[test]
    fn test_reassign_unbound_fails() {
        let mut scopes = ScopeArena::<i32>::new();
        let child = scopes.push(ScopeId::ROOT);
        assert_eq!(
            scopes.reassign(child, "x", 1),
            Err(ScopeError::Undefined("x".to_string()))
        );
    }

    #[test]
    fn test_pop_reclaims_frames() {
        let mut scopes = ScopeArena::<i32>::new();
        let a = scopes.push(ScopeId::ROOT);
        let b = scopes.push(a);
        assert_eq!(scopes.frame_count(), 3);

        scopes.pop(b);
        scopes.pop(a);
        assert_eq!(scopes.frame_count(), 1);

        let c = scopes.push(ScopeId::ROOT);
        assert_eq!(c, a);
    }

    #[test]
    fn test_released_slot_starts_empty() {
        let mut scopes = ScopeArena::new();
        let a = scopes.push(ScopeId::ROOT);
        scopes.declare(a, "x", 1).unwrap();
        scopes.pop(a);

        let b = scopes.push(ScopeId::ROOT);
        assert_eq!(b, a);
        assert_eq!(scopes.lookup(b, "x"), None);
    }

    #[test]
    fn test_out_of_order_pop_releases_at_once() {
        let mut scopes = ScopeArena::<i32>::new();
        let a = scopes.push(ScopeId::ROOT);
        let b = scopes.push(ScopeId::ROOT);

        scopes.pop(a);
        assert_eq!(scopes.frame_count(), 2);
        scopes.pop(b);
        assert_eq!(scopes.frame_count(), 1);
    }

    #[test]
    fn test_captured_frame_survives_pop() {
        let mut scopes = ScopeArena::new();
        let a = scopes.push(ScopeId::ROOT);
        scopes.declare(a, "captured", 7).unwrap();
        scopes.capture(a);
        scopes.pop(a);

        assert_eq!(scopes.frame_count(), 2);
        assert_eq!(scopes.lookup(a, "captured"), Some(&7));

        // Frames opened inside it are still released.
        let b = scopes.push(a);
        scopes.pop(b);
        assert_eq!(scopes.frame_count(), 2);
    }

    #[test]
    fn test_capture_marks_ancestors() {
        let mut scopes = ScopeArena::<i32>::new();
        let a = scopes.push(ScopeId::ROOT);
        let b = scopes.push(a);
        scopes.capture(b);
        scopes.pop(b);
        scopes.pop(a);
        assert_eq!(scopes.frame_count(), 3);
    }

    #[test]
    fn test_collect_releases_unreachable_frames() {
        let mut scopes = ScopeArena::new();
        let a = scopes.push(ScopeId::ROOT);
        scopes.declare(a, "self", Slot::Closure(a)).unwrap();
        scopes.capture(a);
        scopes.pop(a);

        scopes.collect([]);
        assert_eq!(scopes.frame_count(), 1);
    }

    #[test]
    fn test_collect_keeps_frames_held_by_bindings() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "f", Slot::Plain).unwrap();
        let a = scopes.push(ScopeId::ROOT);
        scopes.declare(a, "x", Slot::Plain).unwrap();
        scopes.capture(a);
        scopes.reassign(a, "f", Slot::Closure(a)).unwrap();
        scopes.pop(a);

        scopes.collect([]);
        assert_eq!(scopes.frame_count(), 2);
        assert_eq!(scopes.lookup(a, "x"), Some(&Slot::Plain));

        scopes.reassign(ScopeId::ROOT, "f", Slot::Plain).unwrap();
        scopes.collect([]);
        assert_eq!(scopes.frame_count(), 1);
    }

    #[test]
    fn test_collect_keeps_roots_and_their_parents() {
        let mut scopes = ScopeArena::<Slot>::new();
        let a = scopes.push(ScopeId::ROOT);
        let b = scopes.push(a);
        scopes.capture(b);
        scopes.pop(b);
        scopes.pop(a);

        scopes.collect([b]);
        assert_eq!(scopes.frame_count(), 3);

        scopes.collect([]);
        assert_eq!(scopes.frame_count(), 1);
    }

    #[test]
    fn test_collect_keeps_parents_of_live_frames() {
        let mut scopes = ScopeArena::<Slot>::new();
        let a = scopes.push(ScopeId::ROOT);
        scopes.capture(a);
        scopes.pop(a);
        // A call into a closure defined in `a`.
        let call = scopes.push(a);

        scopes.collect([]);
        assert_eq!(scopes.frame_count(), 3);
        scopes.pop(call);
    }

    #[test]
    fn test_collection_becomes_due() {
        let mut scopes = ScopeArena::<Slot>::new();
        for _ in 0..MIN_COLLECT_AT {
            assert!(!scopes.needs_collection());
            let frame = scopes.push(ScopeId::ROOT);
            scopes.capture(frame);
            scopes.pop(frame);
        }
        assert!(scopes.needs_collection());

        scopes.collect([]);
        assert!(!scopes.needs_collection());
        assert_eq!(scopes.frame_count(), 1);
    }

    #[test]
    fn test_root_is_never_reclaimed() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "a", 1).unwrap();
        scopes.pop(ScopeId::ROOT);
        assert_eq!(scopes.lookup(ScopeId::ROOT, "a"), Some(&1));
    }
}
