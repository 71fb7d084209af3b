//! QR symbol construction.
//!
//! This module turns a payload into a finished [`Symbol`]: it picks a [`Version`] from the
//! capacity table, encodes the payload as a byte-mode [`BitStream`], runs it through an
//! [`ErrorCorrection`] stage, stamps the function patterns, threads the data through the grid
//! in the usual zigzag order and applies the checkerboard mask.
//!
//! Only versions 1 to 5 and byte mode are supported. The default error correction stage is
//! [`PassThrough`], so the symbols produced here carry no redundancy and are not guaranteed
//! to scan on every reader.
use core::fmt;
use core::str::FromStr;

use tracing::{debug, warn};

use crate::error::QrError;

/// A QR symbol: a square grid of dark and light modules.
///
/// Symbols are built fresh for every payload and are immutable once returned.
///
/// # Example
///
/// ```rust
/// use qrcard::qrcode::{QrCodeEcc, Symbol};
///
/// let symbol = Symbol::encode_text("Hello World", QrCodeEcc::High).unwrap();
/// assert_eq!(symbol.version().value(), 1);
/// assert_eq!(symbol.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    version: Version,
    ecl: QrCodeEcc,
    mask: MaskPattern,
    size: usize,
    /// Row-major, `size * size` entries.
    modules: Vec<Module>,
}

impl Symbol {
    /// Encodes a text string into a symbol using the pass-through correction stage.
    ///
    /// The smallest version whose capacity holds the UTF-8 bytes of `text` is chosen. Payloads
    /// longer than the largest version's capacity are clamped to [`Version::MAX`] and placed
    /// until the grid runs out.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::EmptyPayload`] if `text` is empty.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self, QrError> {
        Self::encode_binary(text.as_bytes(), ecl)
    }

    /// Encodes raw bytes into a symbol using the pass-through correction stage.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::EmptyPayload`] if `data` is empty.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self, QrError> {
        Self::encode_with(data, ecl, &PassThrough)
    }

    /// Encodes raw bytes into a symbol, running the bit stream through `corrector`.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::EmptyPayload`] if `data` is empty. No other condition fails.
    pub fn encode_with<E>(data: &[u8], ecl: QrCodeEcc, corrector: &E) -> Result<Self, QrError>
    where
        E: ErrorCorrection + ?Sized,
    {
        if data.is_empty() {
            return Err(QrError::EmptyPayload);
        }

        let version = Version::select(data.len(), ecl);
        let bits = corrector.correct(encode_bytes(data), version, ecl);

        let mut ctx = BuildContext::new(version, ecl);
        ctx.draw_function_patterns(MaskPattern::Checkerboard);
        let placed = ctx.place_data(&bits);
        ctx.apply_mask(MaskPattern::Checkerboard);

        debug!(
            version = version.value(),
            size = ctx.size,
            bits = bits.len(),
            placed,
            "symbol built"
        );
        Ok(ctx.finish(MaskPattern::Checkerboard))
    }

    /// Returns this symbol's version.
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Returns this symbol's width and height in modules (`4 * version + 17`).
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the error correction level recorded in the format information.
    pub const fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    /// Returns the mask pattern applied to the data region.
    pub const fn mask(&self) -> MaskPattern {
        self.mask
    }

    /// Returns the module at the given position, or `None` outside the grid.
    pub fn module(&self, row: usize, col: usize) -> Option<Module> {
        (row < self.size && col < self.size).then(|| self.modules[row * self.size + col])
    }

    /// Returns `true` for a dark module. Positions outside the grid are light.
    pub fn get_module(&self, row: usize, col: usize) -> bool {
        self.module(row, col).is_some_and(Module::is_dark)
    }

    /// Returns `true` if `(row, col)` belongs to a structural pattern and never carries data.
    pub fn is_function_module(&self, row: usize, col: usize) -> bool {
        is_function_position(self.version, row, col)
    }

    /// Returns `true` if `(row, col)` lies inside one of the three 7x7 finder patterns.
    pub fn is_finder_module(&self, row: usize, col: usize) -> bool {
        is_finder_position(self.size, row, col)
    }
}

/// Staged construction of a symbol. Stages run in a fixed order and only the final
/// [`BuildContext::finish`] hands out an immutable [`Symbol`].
#[derive(Clone, Debug)]
struct BuildContext {
    version: Version,
    ecl: QrCodeEcc,
    size: usize,
    modules: Vec<Module>,
}

impl BuildContext {
    fn new(version: Version, ecl: QrCodeEcc) -> Self {
        let size = usize::from(version.size());
        Self {
            version,
            ecl,
            size,
            modules: vec![Module::Light; size * size],
        }
    }

    fn get(&self, row: usize, col: usize) -> Module {
        self.modules[row * self.size + col]
    }

    fn set(&mut self, row: usize, col: usize, module: Module) {
        self.modules[row * self.size + col] = module;
    }

    fn set_dark(&mut self, row: usize, col: usize, isdark: bool) {
        self.set(row, col, Module::from_bit(isdark));
    }

    fn set_unbounded(&mut self, row: i32, col: i32, module: Module) {
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            return;
        };
        if row < self.size && col < self.size {
            self.set(row, col, module);
        }
    }

    fn is_function(&self, row: usize, col: usize) -> bool {
        is_function_position(self.version, row, col)
    }

    fn draw_function_patterns(&mut self, mask: MaskPattern) {
        self.draw_finder_patterns();
        self.draw_separators();
        self.draw_timing_patterns();
        self.draw_dark_module();
        self.draw_format_bits(mask);
    }

    fn draw_finder_patterns(&mut self) {
        for (top, left) in finder_origins(self.size) {
            for r in 0..7usize {
                for c in 0..7usize {
                    // Chebyshev distance 2 from the center is the light ring.
                    let dist = r.abs_diff(3).max(c.abs_diff(3));
                    self.set_dark(top + r, left + c, dist != 2);
                }
            }
        }
    }

    fn draw_separators(&mut self) {
        for (top, left) in finder_origins(self.size) {
            let (cy, cx) = (top as i32 + 3, left as i32 + 3);
            for dy in -4i32..=4 {
                for dx in -4i32..=4 {
                    if dx.abs().max(dy.abs()) == 4 {
                        self.set_unbounded(cy + dy, cx + dx, Module::Light);
                    }
                }
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        for i in 8..self.size - 8 {
            let dark = i % 2 == 0;
            self.set_dark(6, i, dark);
            self.set_dark(i, 6, dark);
        }
    }

    fn draw_dark_module(&mut self) {
        if self.size > usize::from(Version::MIN.size()) {
            self.set(4 * usize::from(self.version.value()) + 9, 8, Module::Dark);
        }
    }

    fn draw_format_bits(&mut self, mask: MaskPattern) {
        let bits = u32::from(format_info_bits(self.ecl, mask));
        let size = self.size as i32;
        for i in 0..15u8 {
            let module = Module::from_bit(get_bit(bits, i));
            let n = i32::from(i);
            // (row, col) of the copy beside the top-left finder, then of the far copy.
            let (near, far) = match i {
                0..=5 => ((8, n), (size - 1 - n, 8)),
                6 | 7 => ((8, n + 1), (size - 7 + n, 8)),
                8 => ((7, 8), (8, size - 8)),
                _ => ((14 - n, 8), (8, size - 15 + n)),
            };
            self.set_unbounded(near.0, near.1, module);
            self.set_unbounded(far.0, far.1, module);
        }
    }

    /// Places `bits` in zigzag order and returns how many were placed.
    fn place_data(&mut self, bits: &BitStream) -> usize {
        let size = self.size;
        let data = bits.as_slice();
        let mut i: usize = 0;
        let mut right: usize = size - 1;
        'sweep: loop {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let row = if upward { size - 1 - vert } else { vert };
                for col in [right, right - 1] {
                    if self.is_function(row, col) {
                        continue;
                    }
                    let Some(&bit) = data.get(i) else {
                        break 'sweep;
                    };
                    self.set_dark(row, col, bit);
                    i += 1;
                }
            }
            if right < 2 {
                break;
            }
            right -= 2;
        }

        if i < data.len() {
            warn!(
                version = self.version.value(),
                placed = i,
                dropped = data.len() - i,
                "data stream exceeds the symbol's placement capacity"
            );
        }
        i
    }

    fn apply_mask(&mut self, mask: MaskPattern) {
        for row in 0..self.size {
            for col in 0..self.size {
                if !self.is_function(row, col) && mask.inverts(row, col) {
                    let toggled = self.get(row, col).toggled();
                    self.set(row, col, toggled);
                }
            }
        }
    }

    fn finish(self, mask: MaskPattern) -> Symbol {
        Symbol {
            version: self.version,
            ecl: self.ecl,
            mask,
            size: self.size,
            modules: self.modules,
        }
    }
}

/// Top-left corners of the three finder patterns as `(row, col)`.
fn finder_origins(size: usize) -> [(usize, usize); 3] {
    [(0, 0), (size - 7, 0), (0, size - 7)]
}

/// Finder neighborhoods (finder, separator and format area), timing lines and the dark module.
fn is_function_position(version: Version, row: usize, col: usize) -> bool {
    let size = usize::from(version.size());
    let finder = (row < 9 && col < 9) || (row < 9 && col >= size - 8) || (row >= size - 8 && col < 9);
    let timing = row == 6 || col == 6;
    let dark = version > Version::MIN && row == 4 * usize::from(version.value()) + 9 && col == 8;
    finder || timing || dark
}

fn is_finder_position(size: usize, row: usize, col: usize) -> bool {
    (row < 7 && col < 7) || (row < 7 && col >= size - 7) || (row >= size - 7 && col < 7)
}

/// Returns the format information word for the given level and mask.
///
/// The level code sits in bits 3 and 4 and the mask id in bits 0 to 2. The remaining ten bits
/// of the 15-cell field are always zero.
pub fn format_info_bits(ecl: QrCodeEcc, mask: MaskPattern) -> u16 {
    u16::from((ecl.format_bits() << 3) | mask.id())
}

/// One cell of the symbol grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Module {
    #[default]
    Light,
    Dark,
}

impl Module {
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    const fn from_bit(isdark: bool) -> Self {
        if isdark { Self::Dark } else { Self::Light }
    }

    const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// A data mask pattern.
///
/// Only pattern 0 is implemented and it is always the pattern recorded in the format
/// information; there is no penalty-based selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum MaskPattern {
    /// Pattern 0: invert where `(row + col) % 2 == 0`.
    #[default]
    Checkerboard,
}

impl MaskPattern {
    /// Returns the 3-bit pattern id written into the format information.
    pub const fn id(self) -> u8 {
        match self {
            Self::Checkerboard => 0,
        }
    }

    /// Returns `true` if the module at `(row, col)` is inverted by this pattern.
    pub const fn inverts(self, row: usize, col: usize) -> bool {
        match self {
            Self::Checkerboard => (row + col) % 2 == 0,
        }
    }
}

/// An append-only sequence of bits, most significant bit first within each appended value.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BitStream {
    bits: Vec<bool>,
}

impl BitStream {
    pub const fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(bits),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Appends the low `len` bits of `val`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `len > 31` or `val` does not fit in `len` bits.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        for i in (0..len).rev() {
            self.bits.push(get_bit(val, i));
        }
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

const BYTE_MODE_INDICATOR: u32 = 0b0100;
const CHAR_COUNT_BITS: u8 = 8;

/// Encodes `data` in byte mode: mode indicator, 8-bit count, then every byte.
///
/// No terminator or padding is added. The count field holds only the low 8 bits of the length.
pub fn encode_bytes(data: &[u8]) -> BitStream {
    let mut bb = BitStream::with_capacity(4 + usize::from(CHAR_COUNT_BITS) + data.len() * 8);
    bb.append_bits(BYTE_MODE_INDICATOR, 4);
    bb.append_bits((data.len() & 0xff) as u32, CHAR_COUNT_BITS);
    for &b in data {
        bb.append_bits(u32::from(b), 8);
    }
    bb
}

/// The stage that appends redundancy to the encoded bit stream.
pub trait ErrorCorrection {
    /// Returns the stream to place in the grid for `data` at the given version and level.
    fn correct(&self, data: BitStream, version: Version, ecl: QrCodeEcc) -> BitStream;
}

/// Error correction stage that returns its input unchanged.
///
/// Symbols built with it carry no correction codewords and are not standard-compliant.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl ErrorCorrection for PassThrough {
    fn correct(&self, data: BitStream, _version: Version, _ecl: QrCodeEcc) -> BitStream {
        data
    }
}

/// Returns the Reed-Solomon generator polynomial for `degree` correction codewords, highest
/// power first, or `None` if the table has no entry for it.
pub fn generator_polynomial(degree: usize) -> Option<&'static [u8]> {
    GENERATOR_POLYNOMIALS
        .iter()
        .find(|(d, _)| *d == degree)
        .map(|&(_, poly)| poly)
}

static GENERATOR_POLYNOMIALS: [(usize, &[u8]); 13] = [
    (7, &[1, 127, 122, 154, 164, 11, 68, 117]),
    (10, &[1, 216, 194, 159, 111, 199, 94, 95, 113, 157, 193]),
    (13, &[1, 137, 73, 227, 17, 177, 17, 52, 13, 46, 43, 83, 132, 120]),
    (15, &[1, 29, 196, 111, 163, 112, 74, 10, 105, 105, 139, 132, 151, 32, 134, 26]),
    (16, &[1, 59, 13, 104, 189, 68, 209, 30, 8, 163, 65, 41, 229, 98, 50, 36, 59]),
    (17, &[1, 119, 66, 83, 120, 119, 22, 197, 83, 249, 41, 143, 134, 85, 53, 125, 99, 79]),
    (
        18,
        &[1, 239, 251, 183, 113, 149, 175, 199, 215, 240, 220, 141, 61, 82, 204, 8, 106, 128, 161],
    ),
    (
        20,
        &[
            1, 152, 185, 240, 5, 111, 99, 6, 220, 112, 150, 69, 36, 187, 22, 228, 198, 121, 121,
            165, 174,
        ],
    ),
    (
        22,
        &[
            1, 89, 179, 131, 176, 182, 244, 19, 189, 69, 40, 28, 137, 29, 123, 67, 253, 86, 218,
            230, 26, 145, 245,
        ],
    ),
    (
        24,
        &[
            1, 122, 118, 169, 70, 178, 237, 216, 102, 115, 150, 229, 73, 130, 72, 61, 43, 206, 1,
            237, 247, 127, 217, 144, 117,
        ],
    ),
    (
        26,
        &[
            1, 246, 51, 183, 4, 136, 98, 199, 152, 77, 56, 206, 24, 145, 40, 209, 117, 233, 42,
            135, 68, 70, 144, 146, 77, 43, 94,
        ],
    ),
    (
        28,
        &[
            1, 252, 9, 28, 13, 18, 251, 208, 150, 103, 174, 100, 41, 167, 12, 247, 56, 117, 119,
            233, 127, 181, 100, 121, 147, 176, 74, 58, 197,
        ],
    ),
    (
        30,
        &[
            1, 212, 246, 77, 73, 195, 192, 75, 98, 5, 70, 103, 177, 22, 217, 138, 51, 181, 246,
            72, 25, 18, 46, 228, 74, 216, 195, 11, 106, 130, 150,
        ],
    ),
];

/// Error correction level for a QR symbol.
///
/// Here the level only selects a capacity column and the 2-bit code in the format information.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum QrCodeEcc {
    /// Nominally tolerates ~7% erroneous codewords.
    Low,
    /// Nominally tolerates ~15% erroneous codewords.
    Medium,
    /// Nominally tolerates ~25% erroneous codewords.
    Quartile,
    /// Nominally tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// Index into the capacity table columns, in the range 0 to 3.
    const fn ordinal(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::Quartile => 2,
            Self::High => 3,
        }
    }

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    const fn format_bits(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 0,
            Self::Quartile => 3,
            Self::High => 2,
        }
    }
}

impl fmt::Display for QrCodeEcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        })
    }
}

impl FromStr for QrCodeEcc {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            _ => Err(QrError::UnknownLevel(s.to_owned())),
        }
    }
}

struct VersionInfo {
    size: u8,
    /// Byte capacity per level, indexed by [`QrCodeEcc::ordinal`].
    capacity: [u16; 4],
}

const CAPACITY_TABLE: [VersionInfo; 5] = [
    VersionInfo { size: 21, capacity: [152, 128, 104, 72] },
    VersionInfo { size: 25, capacity: [272, 224, 176, 128] },
    VersionInfo { size: 29, capacity: [440, 352, 272, 208] },
    VersionInfo { size: 33, capacity: [640, 512, 384, 288] },
    VersionInfo { size: 37, capacity: [864, 688, 496, 368] },
];

/// A supported QR symbol version (1–5).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Version(u8);

impl Version {
    /// The smallest supported version.
    pub const MIN: Version = Version(1);

    /// The largest supported version. Longer payloads are clamped to it.
    pub const MAX: Version = Version(5);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 5].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 5].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the side length in modules, `4 * version + 17`.
    pub const fn size(self) -> u8 {
        CAPACITY_TABLE[(self.0 - 1) as usize].size
    }

    /// Returns the payload capacity in bytes at the given level, as listed in the table.
    pub const fn capacity(self, ecl: QrCodeEcc) -> usize {
        CAPACITY_TABLE[(self.0 - 1) as usize].capacity[ecl.ordinal()] as usize
    }

    /// Iterates over all supported versions, smallest first.
    pub fn all() -> impl Iterator<Item = Version> {
        (Self::MIN.0..=Self::MAX.0).map(Version)
    }

    /// Chooses the smallest version whose capacity at `ecl` is at least `datalen` bytes.
    ///
    /// If none is large enough, [`Version::MAX`] is returned; no length error is raised.
    pub fn select(datalen: usize, ecl: QrCodeEcc) -> Version {
        if let Some(version) = Self::all().find(|v| datalen <= v.capacity(ecl)) {
            debug!(datalen, %ecl, version = version.value(), "version selected");
            return version;
        }
        warn!(
            datalen,
            %ecl,
            capacity = Self::MAX.capacity(ecl),
            "payload exceeds the largest supported version, clamping"
        );
        Self::MAX
    }
}

fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(symbol: &Symbol, top: usize, left: usize, height: usize, width: usize) -> Vec<bool> {
        let mut out = Vec::with_capacity(height * width);
        for row in top..top + height {
            for col in left..left + width {
                out.push(symbol.get_module(row, col));
            }
        }
        out
    }

    fn symbol_for(version: u8, ecl: QrCodeEcc) -> Symbol {
        let len = if version == 1 {
            10
        } else {
            Version::new(version - 1).capacity(ecl) + 1
        };
        let symbol = Symbol::encode_text(&"a".repeat(len), ecl).unwrap();
        assert_eq!(symbol.version().value(), version);
        symbol
    }

    #[test]
    fn test_grid_size_per_version() {
        for version in Version::all() {
            let symbol = symbol_for(version.value(), QrCodeEcc::High);
            let expected = 4 * usize::from(version.value()) + 17;
            assert_eq!(symbol.size(), expected);
            assert_eq!(symbol.modules.len(), expected * expected);
        }
    }

    #[test]
    fn test_version_selection() {
        for ecl in [QrCodeEcc::Low, QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            assert_eq!(Version::select(1, ecl), Version::MIN);
            assert_eq!(Version::select(72, ecl), Version::MIN);
        }
        assert_eq!(Version::select(73, QrCodeEcc::High), Version::new(2));
        assert_eq!(Version::select(152, QrCodeEcc::Low), Version::MIN);
        assert_eq!(Version::select(153, QrCodeEcc::Low), Version::new(2));
        assert_eq!(Version::select(368, QrCodeEcc::High), Version::MAX);
        assert_eq!(Version::select(10_000, QrCodeEcc::High), Version::MAX);
    }

    #[test]
    fn test_hello_world_high() {
        let symbol = Symbol::encode_text("Hello World", QrCodeEcc::High).unwrap();
        assert_eq!(symbol.version(), Version::MIN);
        assert_eq!(symbol.size(), 21);
        assert_eq!(symbol.error_correction_level(), QrCodeEcc::High);
        assert_eq!(symbol.mask(), MaskPattern::Checkerboard);
    }

    #[test]
    fn test_empty_payload_fails() {
        assert!(matches!(Symbol::encode_text("", QrCodeEcc::High), Err(QrError::EmptyPayload)));
    }

    /// Top-left 9x9, top-right 9x8 and bottom-left 8x9 function neighborhoods.
    fn neighborhoods(symbol: &Symbol) -> [Vec<bool>; 3] {
        let size = symbol.size();
        [
            block(symbol, 0, 0, 9, 9),
            block(symbol, 0, size - 8, 9, 8),
            block(symbol, size - 8, 0, 8, 9),
        ]
    }

    #[test]
    fn test_finder_neighborhoods_identical_across_versions() {
        let reference = neighborhoods(&symbol_for(2, QrCodeEcc::Medium));
        for version in 3..=5 {
            assert_eq!(neighborhoods(&symbol_for(version, QrCodeEcc::Medium)), reference, "version {version}");
        }

        // Version 1 differs only in the dark module cell, the first row of the bottom-left block.
        let [tl, tr, mut bl] = neighborhoods(&symbol_for(1, QrCodeEcc::Medium));
        assert_eq!(tl, reference[0]);
        assert_eq!(tr, reference[1]);
        assert!(!bl[8] && reference[2][8]);
        bl[8] = true;
        assert_eq!(bl, reference[2]);
    }

    #[test]
    fn test_finder_pattern_shape() {
        let symbol = symbol_for(1, QrCodeEcc::High);
        for (top, left) in finder_origins(symbol.size()) {
            for r in 0..7 {
                for c in 0..7 {
                    let ring = r == 1 || r == 5 || c == 1 || c == 5;
                    let inner = (1..=5).contains(&r) && (1..=5).contains(&c);
                    let expected = !(ring && inner);
                    assert_eq!(symbol.get_module(top + r, left + c), expected, "({r}, {c})");
                }
            }
        }
    }

    #[test]
    fn test_separators_are_light() {
        let symbol = symbol_for(3, QrCodeEcc::Low);
        let size = symbol.size();
        for i in 0..8 {
            assert!(!symbol.get_module(7, i));
            assert!(!symbol.get_module(i, 7));
            assert!(!symbol.get_module(7, size - 1 - i));
            assert!(!symbol.get_module(i, size - 8));
            assert!(!symbol.get_module(size - 8, i));
            assert!(!symbol.get_module(size - 1 - i, 7));
        }
    }

    #[test]
    fn test_timing_patterns_alternate() {
        for version in Version::all() {
            let symbol = symbol_for(version.value(), QrCodeEcc::Quartile);
            for i in 8..symbol.size() - 8 {
                assert_eq!(symbol.get_module(6, i), i % 2 == 0);
                assert_eq!(symbol.get_module(i, 6), i % 2 == 0);
            }
        }
    }

    #[test]
    fn test_dark_module_beyond_version_one() {
        for version in 2..=5 {
            let symbol = symbol_for(version, QrCodeEcc::High);
            let row = 4 * usize::from(version) + 9;
            assert!(symbol.get_module(row, 8));
            assert!(symbol.is_function_module(row, 8));
        }
    }

    #[test]
    fn test_no_dark_module_in_version_one() {
        for ecl in [QrCodeEcc::Low, QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            let symbol = symbol_for(1, ecl);
            // (13, 8) sits in the bottom-left neighborhood, so it stays light and unmasked.
            assert!(!symbol.get_module(13, 8));
            assert!(symbol.is_function_module(13, 8));
        }
    }

    #[test]
    fn test_format_info_bits() {
        assert_eq!(format_info_bits(QrCodeEcc::Low, MaskPattern::Checkerboard), 0b01_000);
        assert_eq!(format_info_bits(QrCodeEcc::Medium, MaskPattern::Checkerboard), 0b00_000);
        assert_eq!(format_info_bits(QrCodeEcc::Quartile, MaskPattern::Checkerboard), 0b11_000);
        assert_eq!(format_info_bits(QrCodeEcc::High, MaskPattern::Checkerboard), 0b10_000);
    }

    #[test]
    fn test_format_info_neighborhood_high() {
        let symbol = Symbol::encode_text("Hello World", QrCodeEcc::High).unwrap();
        let size = symbol.size();
        // Bit 4 at (8, 4); (8, 6) is the timing column.
        let row8: Vec<bool> = (0..9).map(|col| symbol.get_module(8, col)).collect();
        assert_eq!(row8, [false, false, false, false, true, false, true, false, false]);
        assert!((0..8).filter(|&row| row != 6).all(|row| !symbol.get_module(row, 8)));
        assert!((size - 8..size).all(|col| !symbol.get_module(8, col)));
        let col8: Vec<bool> = (size - 7..size).map(|row| symbol.get_module(row, 8)).collect();
        assert_eq!(col8, [false, false, true, false, false, false, false]);
    }

    #[test]
    fn test_format_info_placement() {
        for ecl in [QrCodeEcc::Low, QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            let symbol = symbol_for(2, ecl);
            let bits = u32::from(format_info_bits(ecl, MaskPattern::Checkerboard));
            let size = symbol.size();
            for i in 0..6u8 {
                assert_eq!(symbol.get_module(8, usize::from(i)), get_bit(bits, i));
            }
            // Bit 6 lands on the last row after bit 0 and overwrites it.
            for i in 1..6u8 {
                assert_eq!(symbol.get_module(size - 1 - usize::from(i), 8), get_bit(bits, i));
            }
            assert_eq!(symbol.get_module(size - 1, 8), get_bit(bits, 6));
            assert_eq!(symbol.get_module(8, 7), get_bit(bits, 6));
            assert_eq!(symbol.get_module(8, 8), get_bit(bits, 7));
            assert_eq!(symbol.get_module(7, 8), get_bit(bits, 8));
            assert_eq!(symbol.get_module(8, size - 8), get_bit(bits, 8));
            for i in 9..15u8 {
                assert_eq!(symbol.get_module(usize::from(14 - i), 8), get_bit(bits, i));
                assert_eq!(symbol.get_module(8, size - 15 + usize::from(i)), get_bit(bits, i));
            }
        }
    }

    #[test]
    fn test_encode_bytes_layout() {
        let bits: Vec<bool> = encode_bytes(b"A").iter().collect();
        let expected: Vec<bool> = "0100_00000001_01000001"
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c == '1')
            .collect();
        assert_eq!(bits, expected);
        assert_eq!(encode_bytes(b"Hello World").len(), 4 + 8 + 11 * 8);
    }

    #[test]
    fn test_count_field_keeps_low_byte() {
        let data = vec![b'x'; 300];
        let bits = encode_bytes(&data);
        let count: u32 = bits.as_slice()[4..12]
            .iter()
            .fold(0, |acc, &b| (acc << 1) | u32::from(b));
        assert_eq!(count, 300 & 0xff);
    }

    #[test]
    fn test_pass_through_is_identity() {
        let bits = encode_bytes(b"contact");
        let out = PassThrough.correct(bits.clone(), Version::MIN, QrCodeEcc::High);
        assert_eq!(out, bits);
    }

    #[test]
    fn test_generator_polynomials() {
        for degree in [7, 10, 13, 15, 16, 17, 18, 20, 22, 24, 26, 28, 30] {
            let poly = generator_polynomial(degree).unwrap();
            assert_eq!(poly.len(), degree + 1);
            assert_eq!(poly[0], 1);
        }
        assert!(generator_polynomial(8).is_none());
    }

    #[test]
    fn test_placement_order() {
        let mut ctx = BuildContext::new(Version::MIN, QrCodeEcc::Low);
        ctx.draw_function_patterns(MaskPattern::Checkerboard);
        let bits: BitStream = [true, true, false, true, true].into_iter().collect();
        assert_eq!(ctx.place_data(&bits), 5);
        assert_eq!(ctx.get(20, 20), Module::Dark);
        assert_eq!(ctx.get(20, 19), Module::Dark);
        assert_eq!(ctx.get(19, 20), Module::Light);
        assert_eq!(ctx.get(19, 19), Module::Dark);
        assert_eq!(ctx.get(18, 20), Module::Dark);
    }

    #[test]
    fn test_placement_zigzags_between_column_pairs() {
        let mut ctx = BuildContext::new(Version::MIN, QrCodeEcc::Low);
        ctx.draw_function_patterns(MaskPattern::Checkerboard);
        // The first pair (columns 20 and 19) holds rows 9..=20, traversed upward.
        let bits: BitStream = core::iter::repeat(false).take(24).chain([true]).collect();
        ctx.place_data(&bits);
        assert_eq!(ctx.get(9, 18), Module::Dark);
        let dark = (0..21)
            .flat_map(|r| (0..21).map(move |c| (r, c)))
            .filter(|&(r, c)| !ctx.is_function(r, c) && ctx.get(r, c).is_dark())
            .count();
        assert_eq!(dark, 1);
    }

    #[test]
    fn test_placement_skips_timing_column() {
        let mut ctx = BuildContext::new(Version::MIN, QrCodeEcc::Low);
        ctx.draw_function_patterns(MaskPattern::Checkerboard);
        let before: Vec<Module> = (0..21).map(|r| ctx.get(r, 6)).collect();
        let bits: BitStream = core::iter::repeat(true).take(1000).collect();
        ctx.place_data(&bits);
        let after: Vec<Module> = (0..21).map(|r| ctx.get(r, 6)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_placement_stops_at_capacity() {
        let mut ctx = BuildContext::new(Version::MIN, QrCodeEcc::Low);
        ctx.draw_function_patterns(MaskPattern::Checkerboard);
        let capacity = (0..21)
            .flat_map(|r| (0..21).map(move |c| (r, c)))
            .filter(|&(r, c)| !ctx.is_function(r, c))
            .count();
        let bits: BitStream = core::iter::repeat(true).take(capacity + 50).collect();
        assert_eq!(ctx.place_data(&bits), capacity);
    }

    #[test]
    fn test_mask_twice_restores_grid() {
        let mut ctx = BuildContext::new(Version::new(2), QrCodeEcc::Medium);
        ctx.draw_function_patterns(MaskPattern::Checkerboard);
        ctx.place_data(&encode_bytes(b"BEGIN:VCARD"));
        let placed = ctx.modules.clone();
        ctx.apply_mask(MaskPattern::Checkerboard);
        assert_ne!(ctx.modules, placed);
        ctx.apply_mask(MaskPattern::Checkerboard);
        assert_eq!(ctx.modules, placed);
    }

    #[test]
    fn test_mask_leaves_function_modules() {
        let mut ctx = BuildContext::new(Version::new(4), QrCodeEcc::Quartile);
        ctx.draw_function_patterns(MaskPattern::Checkerboard);
        let before = ctx.clone();
        ctx.apply_mask(MaskPattern::Checkerboard);
        for row in 0..ctx.size {
            for col in 0..ctx.size {
                if ctx.is_function(row, col) {
                    assert_eq!(ctx.get(row, col), before.get(row, col));
                } else {
                    assert_eq!(ctx.get(row, col).is_dark(), MaskPattern::Checkerboard.inverts(row, col));
                }
            }
        }
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("H".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::High);
        assert_eq!("quartile".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::Quartile);
        assert_eq!(" m ".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::Medium);
        assert!(matches!("X".parse::<QrCodeEcc>(), Err(QrError::UnknownLevel(_))));
    }

    #[test]
    fn test_get_module_out_of_range_is_light() {
        let symbol = symbol_for(1, QrCodeEcc::High);
        assert!(symbol.get_module(0, 0));
        assert!(!symbol.get_module(21, 0));
        assert!(!symbol.get_module(0, 21));
        assert_eq!(symbol.module(21, 21), None);
    }
}
