//! Plain-data values that can be stored in the EEPROM as raw bytes.

/// Types whose in-memory representation can be copied to and from the chip.
///
/// # Safety
///
/// Implementors must have no padding bytes and no invalid bit patterns: every
/// byte of the value is meaningful and any byte sequence read back is a valid
/// value. Structs need `#[repr(C)]` (or `packed`) and only `Plain` fields laid
/// out without gaps. The byte order is the host's.
pub unsafe trait Plain: Copy {}

macro_rules! impl_plain {
    ($($t:ty),*) => {
        $(unsafe impl Plain for $t {})*
    };
}

impl_plain!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}

pub(crate) fn bytes_of<T: Plain>(value: &T) -> &[u8] {
    // SAFETY: `Plain` guarantees every byte of `T` is initialized.
    unsafe { core::slice::from_raw_parts(value as *const T as *const u8, core::mem::size_of::<T>()) }
}

pub(crate) fn bytes_of_mut<T: Plain>(value: &mut T) -> &mut [u8] {
    // SAFETY: `Plain` guarantees any byte pattern written here is a valid `T`.
    unsafe { core::slice::from_raw_parts_mut(value as *mut T as *mut u8, core::mem::size_of::<T>()) }
}
