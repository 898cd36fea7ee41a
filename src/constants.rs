// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Application directory name under the user's config dir
pub const APP_DIR_NAME: &str = "nvenc-caps";

/// Configuration file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Width of the left-justified capability name column in text output
pub const NAME_COLUMN_WIDTH: usize = 38;

/// Pixels in one 16x16 macroblock
///
/// Used to turn macroblocks/second into an approximate pixel rate.
/// Fixed for every codec.
pub const MACROBLOCK_PIXELS: i64 = 256;

/// Literal printed when a device supports none of the probed codecs
pub const NO_SUPPORTED_CODEC: &str = "No supported codec";
