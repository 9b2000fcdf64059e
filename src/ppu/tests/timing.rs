//! Frame timing tests: dot/scanline advance, VBlank and NMI edges, the
//! odd-frame dot skip

use super::*;
use crate::ppu::constants::{
    ctrl, mask, status, DOTS_PER_SCANLINE, LAST_SCANLINE, PRERENDER_SCANLINE,
};

/// Dots in one frame when rendering is disabled
const DOTS_PER_FRAME: u32 = DOTS_PER_SCANLINE as u32 * 262;

#[test]
fn test_dot_and_scanline_advance_one_step() {
    let mut ppu = Ppu::new();

    // Rendering disabled: every tick advances exactly one dot with
    // wraparound at 341 dots and scanline 260
    let mut expected_dot: u16 = 0;
    let mut expected_scanline: i16 = PRERENDER_SCANLINE;

    for _ in 0..DOTS_PER_FRAME + 10 {
        assert_eq!(ppu.dot(), expected_dot);
        assert_eq!(ppu.scanline(), expected_scanline);

        ppu.clock();

        expected_dot += 1;
        if expected_dot == DOTS_PER_SCANLINE {
            expected_dot = 0;
            expected_scanline += 1;
            if expected_scanline > LAST_SCANLINE {
                expected_scanline = PRERENDER_SCANLINE;
            }
        }
    }
}

#[test]
fn test_vblank_sets_at_241_1() {
    let mut ppu = Ppu::new();

    // Run to just before (241, 1)
    while !(ppu.scanline() == 241 && ppu.dot() == 1) {
        ppu.clock();
        assert_eq!(
            ppu.ppustatus & status::VBLANK,
            0,
            "VBlank must not be set before (241,1) is processed"
        );
    }

    ppu.clock();
    assert_ne!(ppu.ppustatus & status::VBLANK, 0);
}

#[test]
fn test_vblank_sets_exactly_once_per_frame() {
    let mut ppu = Ppu::new();
    ppu.ppumask = mask::SHOW_BACKGROUND;

    let mut rising_edges = 0;
    let mut vblank_was_set = false;

    // One full frame from (-1, 0) back to (-1, 0)
    loop {
        ppu.clock();

        let vblank = ppu.ppustatus & status::VBLANK != 0;
        if vblank && !vblank_was_set {
            rising_edges += 1;
        }
        vblank_was_set = vblank;

        if ppu.take_frame_complete() {
            break;
        }
    }

    assert_eq!(rising_edges, 1);
}

#[test]
fn test_prerender_clears_flags() {
    let mut ppu = Ppu::new();
    ppu.ppustatus = status::VBLANK | status::SPRITE_ZERO_HIT | status::SPRITE_OVERFLOW;
    ppu.scanline = PRERENDER_SCANLINE;
    ppu.dot = 1;

    ppu.clock();

    assert_eq!(
        ppu.ppustatus & (status::VBLANK | status::SPRITE_ZERO_HIT | status::SPRITE_OVERFLOW),
        0
    );
}

#[test]
fn test_nmi_raised_with_enable() {
    let mut ppu = Ppu::new();
    ppu.cpu_write(0x2000, ctrl::ENABLE_NMI);

    while !(ppu.scanline() == 241 && ppu.dot() == 1) {
        ppu.clock();
        assert!(!ppu.nmi_pending);
    }

    ppu.clock();
    assert!(ppu.take_nmi(), "NMI pending at the VBlank edge");
    assert!(!ppu.take_nmi(), "take_nmi consumes the edge");
}

#[test]
fn test_no_nmi_without_enable() {
    let mut ppu = Ppu::new();

    for _ in 0..DOTS_PER_FRAME {
        ppu.clock();
    }
    assert!(!ppu.take_nmi());
}

#[test]
fn test_odd_frame_skips_first_visible_dot() {
    // With rendering on and an odd frame, (0, 0) is skipped
    let mut ppu = Ppu::new();
    ppu.ppumask = mask::SHOW_BACKGROUND;
    ppu.frame_odd = true;
    ppu.scanline = 0;
    ppu.dot = 0;

    ppu.clock();
    assert_eq!(ppu.dot(), 2, "dot 0 collapsed into dot 1");

    // Even frames keep the idle dot
    let mut ppu = Ppu::new();
    ppu.ppumask = mask::SHOW_BACKGROUND;
    ppu.frame_odd = false;
    ppu.scanline = 0;
    ppu.dot = 0;

    ppu.clock();
    assert_eq!(ppu.dot(), 1);
}

#[test]
fn test_frame_complete_latches_once() {
    let mut ppu = Ppu::new();

    let mut frames = 0;
    for _ in 0..DOTS_PER_FRAME * 2 {
        ppu.clock();
        if ppu.take_frame_complete() {
            frames += 1;
        }
    }

    assert_eq!(frames, 2);
    assert_eq!(ppu.frame_count(), 2);
}
