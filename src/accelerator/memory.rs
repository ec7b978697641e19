use crate::CapacityError;

/// Size of one page of linear memory.
pub const PAGE_SIZE: usize = 64 * 1024;

/// Location of a sub-region inside of linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub offset: usize,
    pub len: usize,
}

impl Region {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    #[inline]
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.len)
    }
}

/// Growable byte-addressable memory of the accelerated runtime.
///
/// Memory is allocated by pages and never shrinks. Slices returned by
/// methods of this type borrow the memory, so they can't outlive
/// growing of it.
#[derive(Debug)]
pub struct LinearMemory {
    bytes: Vec<u8>,
    max_pages: usize,
}

impl LinearMemory {
    pub fn new(initial_pages: usize, max_pages: usize) -> Result<Self, CapacityError> {
        let mut memory = Self {
            bytes: Vec::new(),
            max_pages,
        };
        memory.grow(initial_pages)?;
        Ok(memory)
    }

    #[inline]
    pub fn pages(&self) -> usize {
        self.bytes.len() / PAGE_SIZE
    }

    #[inline]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Adds `delta` zeroed pages to the memory.
    /// Returns count of pages before growing.
    pub fn grow(&mut self, delta: usize) -> Result<usize, CapacityError> {
        let old_pages = self.pages();
        let new_pages = old_pages.checked_add(delta).ok_or(CapacityError::Overflow)?;
        if new_pages > self.max_pages {
            return Err(CapacityError::ExceedsMaxPages {
                pages: new_pages,
                max_pages: self.max_pages,
            });
        }
        let new_len = new_pages
            .checked_mul(PAGE_SIZE)
            .ok_or(CapacityError::Overflow)?;
        self.bytes
            .try_reserve_exact(new_len - self.bytes.len())
            .map_err(|_| CapacityError::AllocationFailed(new_len))?;
        self.bytes.resize(new_len, 0);
        Ok(old_pages)
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Unsigned view of the region, if it lies inside of the memory.
    pub fn region(&self, region: Region) -> Option<&[u8]> {
        self.bytes.get(region.offset..region.end()?)
    }

    pub fn region_mut(&mut self, region: Region) -> Option<&mut [u8]> {
        let end = region.end()?;
        self.bytes.get_mut(region.offset..end)
    }

    /// Signed view of the region, if it lies inside of the memory.
    pub fn region_i8(&self, region: Region) -> Option<&[i8]> {
        self.region(region).map(bytemuck::cast_slice)
    }

    pub fn region_i8_mut(&mut self, region: Region) -> Option<&mut [i8]> {
        self.region_mut(region).map(bytemuck::cast_slice_mut)
    }
}
