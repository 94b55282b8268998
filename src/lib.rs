//! # hudpng
//!
//! A minimal RGBA8 PNG codec with HUD layout checks.
//!
//! The codec reads and writes 8-bit RGBA, non-interlaced PNG files. On top
//! of it sit a layout validator for 1280x720 HUD screenshots, drawing
//! primitives for synthesizing reference images, and drivers that generate
//! and check a directory of baselines.
//!
//! ## Features
//!
//! - **PNG decoding** of all five scanline filters, split IDAT, CRC checks
//! - **PNG encoding** with deterministic output
//! - **Layout validation** of an empty toast region and a content safe area
//! - Optional parallel batch checking via `parallel` feature
//! - Optional `hudpng` command-line tool via `cli` feature
//!
//! ## Example
//!
//! ```rust
//! use hudpng::{layout, png, Canvas, Rect, Rgba};
//!
//! let bg = Rgba::opaque(0x14, 0x18, 0x1F);
//! let mut canvas = Canvas::new(1280, 720, bg).unwrap();
//! hudpng::draw::fill_rect(&mut canvas, Rect::new(100, 100, 40, 40), Rgba::WHITE);
//!
//! let bytes = png::encode(&canvas).unwrap();
//! let decoded = png::decode(&bytes).unwrap();
//! assert_eq!(decoded, canvas);
//!
//! let verdict = layout::validate(&decoded, &layout::LayoutContract::default(), bg);
//! assert!(verdict.passed());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod baseline;
pub mod canvas;
pub mod chart;
pub mod color;
pub mod draw;
pub mod error;
pub mod layout;
pub mod png;

pub use canvas::{Canvas, Rect};
pub use color::Rgba;
pub use error::{Error, Result};
