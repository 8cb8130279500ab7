// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph advance widths for the built-in Helvetica font.
//
// Values are the standard Adobe AFM widths in 1/1000 em for the printable
// ASCII range (0x20..=0x7E), in WinAnsi order.

use crate::pdf::layout::TextMeasure;

/// Advance widths for U+0020 through U+007E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, // space ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0-7
    556, 556, 278, 278, 584, 584, 584, 556, // 8 9 : ; < = > ?
    1015, 667, 667, 722, 722, 667, 611, 778, // @ A-G
    722, 278, 500, 667, 556, 833, 722, 778, // H-O
    667, 778, 722, 667, 611, 722, 667, 944, // P-W
    667, 667, 611, 278, 278, 278, 469, 556, // X Y Z [ \ ] ^ _
    333, 556, 556, 500, 556, 556, 278, 556, // ` a-g
    556, 222, 222, 500, 222, 833, 556, 556, // h-o
    556, 556, 333, 500, 278, 556, 500, 722, // p-w
    500, 500, 500, 334, 260, 334, 584, // x y z { | } ~
];

/// Width used for characters outside the table.
const FALLBACK_WIDTH: u16 = 556;

/// Advance width of a single character in 1/1000 em.
pub fn helvetica_char_width(c: char) -> u16 {
    match c as u32 {
        code @ 0x20..=0x7E => HELVETICA_WIDTHS[(code - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Measures strings set in Helvetica at a fixed point size.
#[derive(Debug, Clone, Copy)]
pub struct Helvetica {
    pub size_pt: f32,
}

impl Helvetica {
    pub fn new(size_pt: f32) -> Self {
        Self { size_pt }
    }
}

impl TextMeasure for Helvetica {
    fn width(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| helvetica_char_width(c) as u32).sum();
        units as f32 * self.size_pt / 1000.0
    }
}
