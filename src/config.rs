//! Price book and mix book persistence.
//!
//! The costing core treats configuration as injected values; this module is
//! the external collaborator that owns them on disk. The price book lives in
//! a single JSON document with `prices` and `config` sections, loaded once
//! at startup and rewritten only by the admin save endpoint.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::estimating::models::PriceBook;
use crate::estimating::mortar::MixBook;

pub const DEFAULT_PRICEBOOK_PATH: &str = "config/pricebook.json";

/// Price book document path: `FERROTEK_PRICEBOOK` or the repo default.
pub fn pricebook_path_from_env() -> PathBuf {
    std::env::var("FERROTEK_PRICEBOOK")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_PRICEBOOK_PATH))
}

/// Load the price book document, falling back to the built-in price list
/// when no document exists yet.
pub fn load_price_book(path: &Path) -> Result<PriceBook> {
    if !path.exists() {
        tracing::info!(
            "no price book at {}, using built-in prices",
            path.display()
        );
        return Ok(PriceBook::builtin());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read price book {}", path.display()))?;
    let book: PriceBook = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse price book {}", path.display()))?;
    book.validate()
        .map_err(anyhow::Error::new)
        .with_context(|| format!("invalid price book {}", path.display()))?;
    tracing::info!(
        "loaded price book from {} ({} SKUs)",
        path.display(),
        book.prices.len()
    );
    Ok(book)
}

/// Persist the price book. Validates before touching the file so a bad save
/// can never clobber a good document.
pub fn save_price_book(path: &Path, book: &PriceBook) -> Result<()> {
    book.validate().map_err(anyhow::Error::new)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(book)?;
    fs::write(path, json)
        .with_context(|| format!("failed to write price book {}", path.display()))?;
    tracing::info!("price book saved to {}", path.display());
    Ok(())
}

/// Mix recipes: loaded from `FERROTEK_MIXBOOK` when set, otherwise the
/// built-in recipes. Mixes change far less often than prices, so a separate,
/// optional document is enough.
pub fn load_mix_book() -> Result<MixBook> {
    let Ok(path) = std::env::var("FERROTEK_MIXBOOK") else {
        return Ok(MixBook::default());
    };
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read mix book {path}"))?;
    let book: MixBook =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse mix book {path}"))?;
    tracing::info!("loaded mix book from {path}");
    Ok(book)
}
