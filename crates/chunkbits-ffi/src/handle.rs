//! Slot+generation handle tables owning the engine instances.
//!
//! A handle packs a table tag (upper 8 bits), a slot index (next 24 bits)
//! and a generation (lower 32 bits). Every table has its own non-zero tag,
//! so a handle issued by one engine kind never resolves in another.
//! Generations start at 1, so the all-zero handle a managed caller holds
//! before `create` never resolves. Removing a value bumps the slot's
//! generation: stale and double-destroyed handles resolve to `None` instead
//! of touching freed memory.

const SLOT_BITS: u32 = 24;
const SLOT_MASK: u32 = (1 << SLOT_BITS) - 1;

/// Tag of the bit set table.
pub(crate) const BITSET_TAG: u8 = 1;
/// Tag of the `i32` buffer table.
pub(crate) const INT_BUFFER_TAG: u8 = 2;
/// Tag of the `f32` buffer table.
pub(crate) const FLOAT_BUFFER_TAG: u8 = 3;

/// Most slots a single table can hold.
pub(crate) const MAX_SLOTS: usize = 1 << SLOT_BITS;

fn encode(tag: u8, slot: u32, generation: u32) -> u64 {
    debug_assert!(slot <= SLOT_MASK);
    ((tag as u64) << 56) | ((slot as u64) << 32) | (generation as u64)
}

/// Split a handle into `(tag, slot, generation)`.
fn decode(handle: u64) -> (u8, usize, u32) {
    let upper = (handle >> 32) as u32;
    (
        (upper >> SLOT_BITS) as u8,
        (upper & SLOT_MASK) as usize,
        handle as u32,
    )
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

impl<T> Slot<T> {
    fn live(&self, generation: u32) -> Option<&T> {
        if self.generation != generation {
            return None;
        }
        self.value.as_ref()
    }

    fn live_mut(&mut self, generation: u32) -> Option<&mut T> {
        if self.generation != generation {
            return None;
        }
        self.value.as_mut()
    }
}

/// Table mapping `u64` handles to owned values of one engine kind.
///
/// `kind` names the engine in log output. `tag` must be non-zero and
/// unique among the process-wide tables.
pub(crate) struct HandleTable<T> {
    kind: &'static str,
    tag: u8,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> HandleTable<T> {
    /// Create an empty table. `const` so it can back a `static Mutex`.
    pub const fn new(kind: &'static str, tag: u8) -> Self {
        Self {
            kind,
            tag,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Take ownership of `value` and return its handle.
    ///
    /// Returns `None` once [`MAX_SLOTS`] values are live.
    pub fn insert(&mut self, value: T) -> Option<u64> {
        let handle = match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.value = Some(value);
                encode(self.tag, idx, slot.generation)
            }
            None if self.slots.len() >= MAX_SLOTS => {
                log::error!("{} table full: {MAX_SLOTS} live handles", self.kind);
                return None;
            }
            None => {
                let idx = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 1,
                    value: Some(value),
                });
                encode(self.tag, idx, 1)
            }
        };
        log::debug!("{} created: handle {handle:#x}", self.kind);
        Some(handle)
    }

    /// Slot index and generation of `handle`, if it carries this table's tag.
    fn locate(&self, handle: u64) -> Option<(usize, u32)> {
        let (tag, idx, generation) = decode(handle);
        if tag != self.tag {
            log::warn!(
                "{}: handle {handle:#x} belongs to another table",
                self.kind
            );
            return None;
        }
        Some((idx, generation))
    }

    /// Shared access to the value behind `handle`.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (idx, generation) = self.locate(handle)?;
        let found = self.slots.get(idx).and_then(|s| s.live(generation));
        if found.is_none() {
            self.stale(handle);
        }
        found
    }

    /// Exclusive access to the value behind `handle`.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (idx, generation) = self.locate(handle)?;
        let kind = self.kind;
        let found = self
            .slots
            .get_mut(idx)
            .and_then(|s| s.live_mut(generation));
        if found.is_none() {
            log::warn!("{kind}: stale or unknown handle {handle:#x}");
        }
        found
    }

    /// Exclusive access to `target` together with shared access to `source`.
    ///
    /// Returns `None` if either handle is stale, or if both name the same
    /// slot (callers handle self-application separately).
    pub fn get_pair(&mut self, target: u64, source: u64) -> Option<(&mut T, &T)> {
        let (t_idx, t_gen) = self.locate(target)?;
        let (s_idx, s_gen) = self.locate(source)?;
        if t_idx == s_idx {
            return None;
        }
        if t_idx >= self.slots.len() || s_idx >= self.slots.len() {
            self.stale(if t_idx < self.slots.len() { source } else { target });
            return None;
        }
        let (t_slot, s_slot) = if t_idx < s_idx {
            let (lo, hi) = self.slots.split_at_mut(s_idx);
            (&mut lo[t_idx], &hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(t_idx);
            (&mut hi[0], &lo[s_idx])
        };
        match (t_slot.live_mut(t_gen), s_slot.live(s_gen)) {
            (Some(t), Some(s)) => Some((t, s)),
            _ => {
                log::warn!(
                    "{}: stale or unknown handle in pair {target:#x}/{source:#x}",
                    self.kind
                );
                None
            }
        }
    }

    /// Remove and return the value behind `handle`.
    ///
    /// The slot's generation is bumped before reuse. A slot whose generation
    /// would wrap back to 0 is retired for good, so no stale handle from an
    /// earlier epoch can ever match it again.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (idx, generation) = self.locate(handle)?;
        let Some(slot) = self.slots.get_mut(idx) else {
            self.stale(handle);
            return None;
        };
        if slot.generation != generation || slot.value.is_none() {
            self.stale(handle);
            return None;
        }
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free.push(idx as u32);
        }
        log::debug!("{} destroyed: handle {handle:#x}", self.kind);
        value
    }

    /// Number of live values.
    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }

    fn stale(&self, handle: u64) {
        log::warn!("{}: stale or unknown handle {handle:#x}", self.kind);
    }
}
