//! Section-relative addresses and address ranges.
//!
//! Grounded on `lldb_private::Address`/`AddressRange`
//! (`original_source/include/lldb/Core/Address.h`,
//! `original_source/source/Core/AddressRange.cpp`): an address is either
//! an offset into a named section, or (when no section applies) a bare
//! absolute offset. File address and load address are two different
//! projections of the same `Address` value, the latter requiring the
//! section's load bias to currently be known.

use std::cell::Cell;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

/// Sentinel offset meaning "no valid address".
pub const INVALID_ADDRESS: u64 = u64::MAX;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SectionId(u32);

static NEXT_SECTION_ID: AtomicU32 = AtomicU32::new(1);

impl SectionId {
    pub fn new() -> Self {
        SectionId(NEXT_SECTION_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A contiguous region of the target's image, as supplied by the
/// `Target` collaborator (spec.md §6). The core only ever reads this;
/// it never constructs sections itself.
#[derive(Debug)]
pub struct Section {
    pub id: SectionId,
    /// Base offset of this section within the on-disk file.
    pub file_base: u64,
    /// Base runtime address, once the dynamic loader has resolved it.
    /// `None` means the section is not currently mapped.
    load_base: Cell<Option<u64>>,
}

impl Section {
    pub fn new(file_base: u64) -> Self {
        Section {
            id: SectionId::new(),
            file_base,
            load_base: Cell::new(None),
        }
    }

    pub fn load_base(&self) -> Option<u64> {
        self.load_base.get()
    }

    /// Called by the dynamic-loader plugin once it resolves this
    /// section's runtime location.
    pub fn set_load_base(&self, base: u64) {
        self.load_base.set(Some(base));
    }

    pub fn clear_load_base(&self) {
        self.load_base.set(None);
    }
}

/// A section-qualified address: either `(section, offset)` or an
/// absolute offset when no section applies.
#[derive(Copy, Clone, Debug)]
pub struct Address {
    section_id: Option<SectionId>,
    /// Module identity used only to order addresses from different
    /// modules; comparisons within the same module use `offset`.
    module_ptr: usize,
    offset: u64,
}

impl Address {
    /// An address with no section: offset is interpreted directly as
    /// both file and load address.
    pub fn absolute(offset: u64) -> Self {
        Address {
            section_id: None,
            module_ptr: 0,
            offset,
        }
    }

    pub fn in_section(module_ptr: usize, section: &Section, offset_in_section: u64) -> Self {
        Address {
            section_id: Some(section.id),
            module_ptr,
            offset: offset_in_section,
        }
    }

    pub fn invalid() -> Self {
        Address::absolute(INVALID_ADDRESS)
    }

    pub fn is_valid(&self) -> bool {
        self.offset != INVALID_ADDRESS
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn section_id(&self) -> Option<SectionId> {
        self.section_id
    }

    /// File address: `section.file_base + offset`, or `offset` when no
    /// section is attached.
    pub fn file_address(&self, section: Option<&Section>) -> u64 {
        match section {
            Some(s) => s.file_base.wrapping_add(self.offset),
            None => self.offset,
        }
    }

    /// Load address: `section.load_base(target) + offset` if the
    /// section is currently resolved, else [`INVALID_ADDRESS`].
    pub fn load_address(&self, section: Option<&Section>) -> Option<u64> {
        match section {
            Some(s) => s.load_base().map(|base| base.wrapping_add(self.offset)),
            None => Some(self.offset),
        }
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.module_ptr == other.module_ptr && self.offset == other.offset
    }
}
impl Eq for Address {}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Address {
    /// Total order on `(module_ptr, offset)`. Meaningful as a total
    /// order for use in maps/sets; only comparisons within the same
    /// module carry semantic meaning (spec.md §3).
    fn cmp(&self, other: &Self) -> Ordering {
        self.module_ptr
            .cmp(&other.module_ptr)
            .then(self.offset.cmp(&other.offset))
    }
}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.module_ptr.hash(state);
        self.offset.hash(state);
    }
}

/// A contiguous range of addresses, base-relative to the same module as
/// `base`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressRange {
    pub base: Address,
    pub byte_size: u64,
}

impl AddressRange {
    pub fn new(base: Address, byte_size: u64) -> Self {
        AddressRange { base, byte_size }
    }

    pub fn end_offset(&self) -> u64 {
        self.base.offset().saturating_add(self.byte_size)
    }

    pub fn contains(&self, addr: &Address) -> bool {
        addr.module_ptr == self.base.module_ptr
            && addr.offset >= self.base.offset
            && addr.offset < self.end_offset()
    }

    pub fn overlaps(&self, other: &AddressRange) -> bool {
        if self.base.module_ptr != other.base.module_ptr {
            return false;
        }
        self.base.offset < other.end_offset() && other.base.offset < self.end_offset()
    }

    /// The overlapping sub-range of `self` and `other`, if any.
    pub fn intersection(&self, other: &AddressRange) -> Option<AddressRange> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.base.offset.max(other.base.offset);
        let end = self.end_offset().min(other.end_offset());
        let mut base = self.base;
        base.offset = start;
        Some(AddressRange::new(base, end - start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_address_round_trips_as_both_file_and_load() {
        let addr = Address::absolute(0x1000);
        assert_eq!(addr.file_address(None), 0x1000);
        assert_eq!(addr.load_address(None), Some(0x1000));
    }

    #[test]
    fn invalid_address_is_invalid() {
        assert!(!Address::invalid().is_valid());
        assert!(Address::absolute(0).is_valid());
    }

    #[test]
    fn section_load_address_is_none_until_resolved() {
        let section = Section::new(0x400000);
        let addr = Address::in_section(1, &section, 0x10);
        assert_eq!(addr.file_address(Some(&section)), 0x400010);
        assert_eq!(addr.load_address(Some(&section)), None);

        section.set_load_base(0x7f0000000000);
        assert_eq!(addr.load_address(Some(&section)), Some(0x7f0000000010));
    }

    #[test]
    fn ranges_overlap_and_intersect() {
        let a = AddressRange::new(Address::absolute(0x1000), 8);
        let b = AddressRange::new(Address::absolute(0x1004), 8);
        assert!(a.overlaps(&b));
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.base.offset(), 0x1004);
        assert_eq!(i.byte_size, 4);

        let c = AddressRange::new(Address::absolute(0x2000), 8);
        assert!(!a.overlaps(&c));
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn ordering_is_total_within_same_module() {
        let a = Address::absolute(0x10);
        let b = Address::absolute(0x20);
        assert!(a < b);
    }
}
