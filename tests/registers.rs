use ap_mailbox::Core::{RegisterInterface, VolatileRegisters};
use std::ptr::NonNull;

fn window(words: &mut [u32]) -> VolatileRegisters {
    let len = words.len() * 4;
    let base = NonNull::new(words.as_mut_ptr() as *mut u8).unwrap();
    unsafe { VolatileRegisters::new(base, len) }
}

#[test]
fn test_volatile_access_at_window_edges() {
    let mut words = [0u32; 4];
    let regs = window(&mut words);
    assert_eq!(regs.len(), 16);

    regs.write32(0, 0xDEAD_BEEF);
    regs.write32(12, 7);
    regs.write8(15, 0xAB);
    assert_eq!(regs.read32(0), 0xDEAD_BEEF);
    assert_eq!(regs.read8(15), 0xAB);

    assert_eq!(words[0], 0xDEAD_BEEF);
    assert_eq!(words[3].to_ne_bytes()[3], 0xAB);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "outside")]
fn test_word_straddling_the_end_is_caught() {
    let mut words = [0u32; 4];
    let regs = window(&mut words);
    regs.read32(13);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "outside")]
fn test_address_near_usize_max_is_caught() {
    let mut words = [0u32; 4];
    let regs = window(&mut words);
    regs.write8(usize::MAX, 1);
}
