//! `--purge-cache`: drop every cached package.

use crate::cache::CacheLayout;
use crate::error::Result;
use crate::ui::progress::Progress;

pub fn run(layout: &CacheLayout) -> Result<()> {
    let progress = Progress::begin("🎣 Sweeping the deck (purging cache)");

    match layout.purge() {
        Ok(true) => {
            progress.finish(
                true,
                &format!(
                    "Yoink cache at {} is now squeaky clean!",
                    layout.root().display()
                ),
            );
            Ok(())
        }
        Ok(false) => {
            progress.finish(
                true,
                &format!(
                    "Tackle box empty! (Cache {} did not exist)",
                    layout.root().display()
                ),
            );
            Ok(())
        }
        Err(e) => {
            progress.finish(false, "Could not purge cache");
            Err(e)
        }
    }
}
