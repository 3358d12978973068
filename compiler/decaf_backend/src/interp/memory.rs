//! Region-based interpreter memory.

use super::{ExecError, Value};

/// Address of an element: a region plus an element offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pointer {
    region: u32,
    offset: i64,
}

/// Region index reserved for [`Pointer::NULL`].
const NULL_REGION: u32 = u32::MAX;

impl Pointer {
    pub const NULL: Self = Self {
        region: NULL_REGION,
        offset: 0,
    };

    #[inline]
    pub(crate) fn new(region: u32, offset: i64) -> Self {
        Self { region, offset }
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.region == NULL_REGION
    }

    #[inline]
    pub(crate) fn offset_by(self, delta: i64) -> Self {
        Self {
            region: self.region,
            offset: self.offset + delta,
        }
    }
}

/// All live regions. Globals come first; stack regions follow and are
/// released in LIFO order.
#[derive(Default)]
pub struct Memory {
    regions: Vec<Vec<Value>>,
}

impl Memory {
    /// Allocate a global's region. Globals are allocated before any stack
    /// region, one per `GlobalId`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "globals are counted by u32 GlobalIds"
    )]
    pub(crate) fn allocate_global(&mut self, cells: Vec<Value>) -> u32 {
        let region = self.regions.len() as u32;
        self.regions.push(cells);
        region
    }

    /// Allocate a stack region, or `None` once region indices run out.
    pub(crate) fn allocate(&mut self, cells: Vec<Value>) -> Option<u32> {
        let region = u32::try_from(self.regions.len())
            .ok()
            .filter(|&region| region != NULL_REGION)?;
        self.regions.push(cells);
        Some(region)
    }

    #[inline]
    pub(crate) fn mark(&self) -> usize {
        self.regions.len()
    }

    /// Drop every region allocated after `mark`.
    pub(crate) fn release(&mut self, mark: usize) {
        self.regions.truncate(mark);
    }

    fn cell(&self, ptr: Pointer) -> Result<(usize, usize), ExecError> {
        if ptr.is_null() {
            return Err(ExecError::NullDereference);
        }
        let region = ptr.region as usize;
        let len = self.regions.get(region).map_or(0, Vec::len);
        match usize::try_from(ptr.offset) {
            Ok(offset) if offset < len => Ok((region, offset)),
            _ => Err(ExecError::OutOfBounds {
                offset: ptr.offset,
                len,
            }),
        }
    }

    pub fn read(&self, ptr: Pointer) -> Result<Value, ExecError> {
        let (region, offset) = self.cell(ptr)?;
        Ok(self.regions[region][offset])
    }

    pub(crate) fn write(&mut self, ptr: Pointer, value: Value) -> Result<(), ExecError> {
        let (region, offset) = self.cell(ptr)?;
        self.regions[region][offset] = value;
        Ok(())
    }

    /// Read a NUL-terminated byte string starting at `ptr`.
    pub fn c_string(&self, ptr: Pointer) -> Option<String> {
        let mut bytes = Vec::new();
        let mut cursor = ptr;
        loop {
            let byte = self.read(cursor).ok()?.as_i32()?;
            if byte == 0 {
                break;
            }
            bytes.push(u8::try_from(byte).ok()?);
            cursor = cursor.offset_by(1);
        }
        String::from_utf8(bytes).ok()
    }
}
