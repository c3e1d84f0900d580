use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use xcap::Window;

use crate::{crop_rect, Frame, FrameSource, Rect};

/// Pixels shaved off the captured window to drop the OS chrome: the
/// border on the left/right/bottom edges and the titlebar on top.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CaptureInsets {
    pub border: u32,
    pub titlebar: u32,
}

impl Default for CaptureInsets {
    fn default() -> Self {
        // Measured against the stock client window decorations.
        Self { border: 8, titlebar: 31 }
    }
}

/// Live frame source backed by a native window capture. The target
/// window is looked up by title substring on every tick, so the tracker
/// recovers when the client is restarted.
pub struct WindowCapture {
    title: String,
    insets: CaptureInsets,
    window_seen: bool,
}

impl WindowCapture {
    pub fn new(title: impl Into<String>, insets: CaptureInsets) -> Self {
        Self {
            title: title.into().to_lowercase(),
            insets,
            window_seen: false,
        }
    }

    fn find_window(&self) -> Option<Window> {
        let windows = match Window::all() {
            Ok(w) => w,
            Err(e) => {
                warn!("failed to enumerate windows: {}", e);
                return None;
            }
        };

        for window in windows {
            let title = match window.title() {
                Ok(t) => t.to_lowercase(),
                Err(_) => continue,
            };
            if title.contains(&self.title) {
                debug!("found table window: {}", title);
                return Some(window);
            }
        }
        None
    }

    fn trim_chrome(&self, img: image::RgbaImage) -> image::RgbaImage {
        let CaptureInsets { border, titlebar } = self.insets;
        if border == 0 && titlebar == 0 {
            return img;
        }
        let (w, h) = (img.width(), img.height());
        if w <= border * 2 || h <= titlebar + border {
            return img;
        }
        let inner = Rect::new(border, titlebar, w - border * 2, h - titlebar - border);
        crop_rect(&img, &inner)
    }
}

impl FrameSource for WindowCapture {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(window) = self.find_window() else {
            if self.window_seen {
                warn!("table window {:?} lost", self.title);
                self.window_seen = false;
            }
            return Ok(None);
        };
        self.window_seen = true;

        match window.capture_image() {
            Ok(img) => Ok(Some(Frame::new(self.trim_chrome(img)))),
            Err(e) => {
                warn!("window capture failed: {}", e);
                Ok(None)
            }
        }
    }
}

/// Titles of all capturable windows, for calibration against a running
/// client.
pub fn list_windows() -> Result<Vec<String>> {
    let windows = Window::all().context("failed to enumerate windows")?;
    Ok(windows
        .into_iter()
        .filter_map(|w| w.title().ok())
        .filter(|t| !t.is_empty())
        .collect())
}
