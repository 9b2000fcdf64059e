//! PPU register behavior tests

use super::*;
use crate::ppu::constants::status;

// Register indices (any mirror of $2000-$2007 works; the port decode
// masks to three bits)
const PPUCTRL: u16 = 0x2000;
const PPUMASK: u16 = 0x2001;
const PPUSTATUS: u16 = 0x2002;
const OAMADDR: u16 = 0x2003;
const OAMDATA: u16 = 0x2004;
const PPUSCROLL: u16 = 0x2005;
const PPUADDR: u16 = 0x2006;
const PPUDATA: u16 = 0x2007;

#[test]
fn test_ctrl_write_updates_t_nametable_bits() {
    let mut ppu = Ppu::new();
    ppu.t = 0x7FFF;

    ppu.cpu_write(PPUCTRL, 0x00);
    assert_eq!(ppu.t & 0x0C00, 0, "both nametable bits cleared");
    assert_eq!(ppu.t & !0x0C00, 0x7FFF & !0x0C00, "no other bit of t moves");

    ppu.cpu_write(PPUCTRL, 0x03);
    assert_eq!(ppu.t & 0x0C00, 0x0C00);
}

#[test]
fn test_status_read_clears_vblank_and_latch() {
    let mut ppu = Ppu::new();
    ppu.ppustatus = status::VBLANK | status::SPRITE_ZERO_HIT;
    ppu.write_latch = true;

    let value = ppu.cpu_read(PPUSTATUS);

    assert_eq!(value & 0xE0, status::VBLANK | status::SPRITE_ZERO_HIT);
    assert_eq!(ppu.ppustatus & status::VBLANK, 0, "VBlank clears on read");
    assert!(!ppu.write_latch, "address latch resets");

    // A second read sees VBlank low
    let value = ppu.cpu_read(PPUSTATUS);
    assert_eq!(value & status::VBLANK, 0);
}

#[test]
fn test_status_low_bits_leak_read_buffer() {
    let mut ppu = Ppu::new();
    ppu.read_buffer = 0x5F;
    ppu.ppustatus = status::VBLANK;

    let value = ppu.cpu_read(PPUSTATUS);
    assert_eq!(value, status::VBLANK | 0x1F);
}

#[test]
fn test_scroll_two_writes() {
    let mut ppu = Ppu::new();

    // X: coarse into t, fine into fine_x
    ppu.cpu_write(PPUSCROLL, 0x7D); // 0b01111_101
    assert_eq!(ppu.t & 0x001F, 0x0F);
    assert_eq!(ppu.fine_x, 0x05);
    assert!(ppu.write_latch);

    // Y: coarse and fine into t
    ppu.cpu_write(PPUSCROLL, 0x5E); // 0b01011_110
    assert_eq!((ppu.t >> 5) & 0x1F, 0x0B, "coarse Y");
    assert_eq!((ppu.t >> 12) & 0x07, 0x06, "fine Y");
    assert!(!ppu.write_latch);
}

#[test]
fn test_addr_two_writes_publish_v() {
    let mut ppu = Ppu::new();

    ppu.cpu_write(PPUADDR, 0x21);
    assert!(ppu.write_latch);
    assert_eq!(ppu.v, 0, "v only updates on the second write");

    ppu.cpu_write(PPUADDR, 0x08);
    assert!(!ppu.write_latch);
    assert_eq!(ppu.v, 0x2108);
    assert_eq!(ppu.t, 0x2108);
}

#[test]
fn test_addr_first_write_clears_bit14() {
    let mut ppu = Ppu::new();

    ppu.cpu_write(PPUADDR, 0xFF); // only the low six bits land
    ppu.cpu_write(PPUADDR, 0x00);
    assert_eq!(ppu.v, 0x3F00);
}

#[test]
fn test_status_read_restarts_write_pair() {
    let mut ppu = Ppu::new();

    ppu.cpu_write(PPUADDR, 0x21);
    ppu.cpu_read(PPUSTATUS); // interrupts the pair

    // Next write is a first-write again
    ppu.cpu_write(PPUADDR, 0x3F);
    assert!(ppu.write_latch);
    ppu.cpu_write(PPUADDR, 0x00);
    assert_eq!(ppu.v, 0x3F00);
}

#[test]
fn test_data_read_is_buffered() {
    let mut ppu = ppu_with_cartridge(false);

    // Point v at the pattern table (CHR bytes are all 0x80)
    ppu.cpu_write(PPUADDR, 0x00);
    ppu.cpu_write(PPUADDR, 0x00);

    let first = ppu.cpu_read(PPUDATA);
    assert_eq!(first, 0x00, "first read returns the stale buffer");

    let second = ppu.cpu_read(PPUDATA);
    assert_eq!(second, 0x80, "second read returns the delayed byte");
}

#[test]
fn test_palette_read_is_immediate() {
    let mut ppu = Ppu::new();
    ppu.palette_ram[0x01] = 0x2A;

    ppu.cpu_write(PPUADDR, 0x3F);
    ppu.cpu_write(PPUADDR, 0x01);

    assert_eq!(ppu.cpu_read(PPUDATA), 0x2A, "palette bypasses the buffer");
}

#[test]
fn test_data_write_then_read_roundtrip() {
    let mut ppu = Ppu::new();

    // Write one byte into a nametable, reread it through the port
    ppu.cpu_write(PPUADDR, 0x21);
    ppu.cpu_write(PPUADDR, 0x08);
    ppu.cpu_write(PPUDATA, 0x5A);

    ppu.cpu_write(PPUADDR, 0x21);
    ppu.cpu_write(PPUADDR, 0x08);
    let _ = ppu.cpu_read(PPUDATA); // dummy buffered read
    assert_eq!(ppu.cpu_read(PPUDATA), 0x5A);
}

#[test]
fn test_data_port_increment_modes() {
    let mut ppu = Ppu::new();

    ppu.cpu_write(PPUADDR, 0x20);
    ppu.cpu_write(PPUADDR, 0x00);
    ppu.cpu_write(PPUDATA, 0x00);
    assert_eq!(ppu.v, 0x2001, "across mode steps by one");

    ppu.cpu_write(PPUCTRL, 0x04);
    ppu.cpu_write(PPUDATA, 0x00);
    assert_eq!(ppu.v, 0x2021, "down mode steps by thirty-two");
}

#[test]
fn test_oam_port() {
    let mut ppu = Ppu::new();

    ppu.cpu_write(OAMADDR, 0x10);
    ppu.cpu_write(OAMDATA, 0xAB);
    assert_eq!(ppu.oam[0x10], 0xAB);
    assert_eq!(ppu.oam_addr, 0x11, "writes increment the address");

    ppu.cpu_write(OAMADDR, 0x10);
    assert_eq!(ppu.cpu_read(OAMDATA), 0xAB);
    assert_eq!(ppu.oam_addr, 0x10, "reads leave the address alone");
}

#[test]
fn test_write_only_ports_read_zero() {
    let mut ppu = Ppu::new();
    ppu.read_buffer = 0; // keep the open-bus bits quiet

    for port in [PPUCTRL, PPUMASK, OAMADDR, PPUSCROLL, PPUADDR] {
        assert_eq!(ppu.cpu_read(port), 0);
    }
}

#[test]
fn test_enabling_nmi_during_vblank_retriggers() {
    let mut ppu = Ppu::new();
    ppu.ppustatus = status::VBLANK;

    ppu.cpu_write(PPUCTRL, 0x80);
    assert!(ppu.take_nmi(), "NMI fires when enabled mid-VBlank");

    // Disabling suppresses a pending NMI
    ppu.cpu_write(PPUCTRL, 0x00);
    ppu.ppustatus = status::VBLANK;
    ppu.cpu_write(PPUCTRL, 0x80);
    ppu.cpu_write(PPUCTRL, 0x00);
    assert!(!ppu.take_nmi());
}
