//! Adaptive colour reduction to the 16-slot hardware palette.
//!
//! Anything that can boil a raster down to an ordered set of representative
//! colours satisfies `Quantizer`; the shipped backend is a deterministic
//! median cut over the image's opaque colours. Box averages are taken in
//! linear RGB so blended slots do not drift dark, and the reduced set is
//! ordered canonically (most frequent first, ties by ascending RGB) so the
//! same image always yields the same palette file.

use std::collections::HashMap;
use std::path::Path;

use palette::{LinSrgb, Srgb};

use crate::error::{PrioError, Result};
use crate::raster::{IndexedRaster, Pixel, Raster};
use crate::types::Colour;

/// Number of colour slots in the hardware palette.
pub const PALETTE_SIZE: usize = 16;

/// A colour paired with its pixel count.
type WeightedColour = (Colour, usize);

/// Reduces a raster to at most `max_colours` representative colours.
///
/// Only direct-colour pixels with a non-zero alpha participate; fully
/// transparent pixels never influence the palette. An empty result means
/// the raster had nothing to sample.
pub trait Quantizer {
    fn reduce(&self, raster: &dyn Raster, max_colours: usize) -> Vec<Colour>;
}

/// Deterministic median-cut quantization.
pub struct MedianCut;

impl Quantizer for MedianCut {
    fn reduce(&self, raster: &dyn Raster, max_colours: usize) -> Vec<Colour> {
        let mut counts: HashMap<Colour, usize> = HashMap::new();
        for y in 0..raster.height() {
            for x in 0..raster.width() {
                if let Pixel::Direct(c) = raster.pixel(x, y) {
                    if c.is_transparent() {
                        continue;
                    }
                    *counts.entry(Colour::rgb(c.r, c.g, c.b)).or_insert(0) += 1;
                }
            }
        }

        let mut entries: Vec<WeightedColour> = counts.into_iter().collect();
        if entries.is_empty() || max_colours == 0 {
            return Vec::new();
        }
        // Hashing order is arbitrary; fix a base order before any splitting.
        entries.sort_by_key(|&(c, _)| (c.r, c.g, c.b));

        if entries.len() > max_colours {
            entries = median_cut(entries, max_colours);
        }

        canonical_sort(&mut entries);
        entries.into_iter().map(|(c, _)| c).collect()
    }
}

/// Split the colour list into `max_colours` boxes and average each box.
fn median_cut(entries: Vec<WeightedColour>, max_colours: usize) -> Vec<WeightedColour> {
    let mut boxes = vec![entries];
    while boxes.len() < max_colours {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.len() > 1)
            .max_by_key(|(i, b)| (population(b), std::cmp::Reverse(*i)))
            .map(|(i, _)| i);
        let index = match candidate {
            Some(i) => i,
            None => break,
        };

        let (left, right) = split_box(boxes.remove(index));
        boxes.push(left);
        boxes.push(right);
    }

    boxes
        .iter()
        .map(|b| (box_average(b), population(b)))
        .collect()
}

/// Order colours most frequent first, ties broken by ascending RGB.
fn canonical_sort(entries: &mut [WeightedColour]) {
    entries.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| (a.0.r, a.0.g, a.0.b).cmp(&(b.0.r, b.0.g, b.0.b)))
    });
}

fn population(entries: &[WeightedColour]) -> usize {
    entries.iter().map(|(_, n)| n).sum()
}

fn channel_value(c: &Colour, channel: usize) -> u8 {
    match channel {
        0 => c.r,
        1 => c.g,
        _ => c.b,
    }
}

/// Pick the channel with the largest value range across the box.
fn widest_channel(entries: &[WeightedColour]) -> usize {
    let mut best = 0;
    let mut best_range = 0u8;
    for channel in 0..3 {
        let lo = entries
            .iter()
            .map(|(c, _)| channel_value(c, channel))
            .min()
            .unwrap_or(0);
        let hi = entries
            .iter()
            .map(|(c, _)| channel_value(c, channel))
            .max()
            .unwrap_or(0);
        let range = hi - lo;
        if range > best_range {
            best_range = range;
            best = channel;
        }
    }
    best
}

/// Cut a box in two at the pixel-count median of its widest channel.
/// Both halves are non-empty; the caller guarantees at least two entries.
fn split_box(mut entries: Vec<WeightedColour>) -> (Vec<WeightedColour>, Vec<WeightedColour>) {
    let channel = widest_channel(&entries);
    entries.sort_by_key(|&(c, _)| (channel_value(&c, channel), c.r, c.g, c.b));

    let half = population(&entries) / 2;
    let mut accumulated = 0;
    let mut cut = 1;
    for (i, (_, count)) in entries.iter().enumerate() {
        accumulated += count;
        if accumulated >= half {
            cut = (i + 1).min(entries.len() - 1).max(1);
            break;
        }
    }

    let right = entries.split_off(cut);
    (entries, right)
}

/// Average a box in linear RGB, weighted by pixel count.
fn box_average(entries: &[WeightedColour]) -> Colour {
    let mut red = 0.0f32;
    let mut green = 0.0f32;
    let mut blue = 0.0f32;
    let mut total = 0.0f32;
    for &(c, count) in entries {
        let linear: LinSrgb<f32> = Srgb::new(c.r, c.g, c.b).into_linear();
        let weight = count as f32;
        red += linear.red * weight;
        green += linear.green * weight;
        blue += linear.blue * weight;
        total += weight;
    }

    let encoded: Srgb<u8> = Srgb::from_linear(LinSrgb::new(red / total, green / total, blue / total));
    Colour::rgb(encoded.red, encoded.green, encoded.blue)
}

/// The 16 ordered palette slots an image quantizes to.
///
/// Unused slots are padded with black so the table always fills the whole
/// hardware palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable {
    slots: [Colour; PALETTE_SIZE],
}

impl PaletteTable {
    /// Build a table from up to 16 colours, padding the rest with black.
    /// Extra colours beyond 16 are dropped.
    pub fn from_colours(colours: &[Colour]) -> Self {
        let mut slots = [Colour::BLACK; PALETTE_SIZE];
        for (slot, colour) in slots.iter_mut().zip(colours.iter()) {
            *slot = *colour;
        }
        Self { slots }
    }

    /// All 16 slots in palette order.
    pub fn slots(&self) -> &[Colour; PALETTE_SIZE] {
        &self.slots
    }

    /// Find the slot nearest to a colour.
    ///
    /// Ties resolve to the lowest slot, so repeated lookups are stable.
    pub fn nearest(&self, colour: &Colour) -> u8 {
        let mut best_index: u8 = 0;
        let mut best_dist = u32::MAX;
        for (i, slot) in self.slots.iter().enumerate() {
            let dist = colour_distance(colour, slot);
            if dist < best_dist {
                best_dist = dist;
                best_index = i as u8;
            }
        }
        best_index
    }
}

/// Weighted RGB colour distance.
///
/// The low-cost approximation from https://www.compuphase.com/cmetric.htm;
/// channel weights follow the mean red value, which tracks perception far
/// better than plain Euclidean distance at this cost.
fn colour_distance(a: &Colour, b: &Colour) -> u32 {
    let rmean = (a.r as i32 + b.r as i32) / 2;
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;

    let r_weight = 2 + (rmean >> 8);
    let g_weight = 4;
    let b_weight = 2 + ((255 - rmean) >> 8);

    (r_weight * dr * dr + g_weight * dg * dg + b_weight * db * db) as u32
}

/// Derive the palette table for a raster, failing when nothing can be
/// sampled (for example a fully transparent image).
pub fn derive_palette(
    quantizer: &dyn Quantizer,
    raster: &dyn Raster,
    source: &Path,
) -> Result<PaletteTable> {
    let colours = quantizer.reduce(raster, PALETTE_SIZE);
    if colours.is_empty() {
        return Err(PrioError::PaletteUnavailable {
            path: source.to_path_buf(),
        });
    }
    Ok(PaletteTable::from_colours(&colours))
}

/// Map every pixel of a raster onto its nearest palette slot.
///
/// Transparent pixels are mapped like any other; the palette carries no
/// transparency, so they land on whichever slot is nearest by RGB.
pub fn index_image(raster: &dyn Raster, palette: &PaletteTable) -> IndexedRaster {
    let mut indices = Vec::with_capacity(raster.width() as usize * raster.height() as usize);
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let index = match raster.pixel(x, y) {
                Pixel::Indexed(i) => i & 0x0F,
                Pixel::Direct(c) => palette.nearest(&c),
            };
            indices.push(index);
        }
    }
    IndexedRaster::new(raster.width(), raster.height(), indices)
}
