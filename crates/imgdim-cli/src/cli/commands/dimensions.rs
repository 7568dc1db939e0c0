//! `imgdim dimensions <path>` – print the natural size of an image.

use anyhow::{Context, Result};
use imgdim_core::decode::FsImageDecoder;
use imgdim_core::format::insertion_text;
use imgdim_core::host::ImageDecoder;
use std::path::Path;

pub async fn run_dimensions(path: &Path, css: bool) -> Result<()> {
    let dims = tokio::task::spawn_blocking({
        let path = path.to_path_buf();
        move || FsImageDecoder::new().dimensions(&path)
    })
    .await
    .context("decode task join")??;
    if css {
        print!("{}", insertion_text(dims));
    } else {
        println!("{}", dims);
    }
    Ok(())
}
