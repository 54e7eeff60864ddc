//! A recorded `RemoteViews` update.
//!
//! `RemoteViews` is a list of setter calls applied to an inflated layout by
//! the launcher process. [`RemoteViews`] records the same calls so the host
//! glue can replay them against the real Android object.

use std::path::PathBuf;

use fmswidget::{DeepLink, ImageFormat, MapImage};
use serde::Serialize;

/// View visibility, as in `android.view.View`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// `View.VISIBLE`
    Visible,
    /// `View.GONE`
    Gone,
}

/// Image scale type for bitmap backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleType {
    /// Scale uniformly to cover the view, cropping the overflow.
    CenterCrop,
    /// Keep the drawable's size, centered.
    Center,
}

/// One recorded setter call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewOp {
    /// `setOnClickPendingIntent` with a launch intent carrying a deep link.
    SetOnClickDeepLink {
        /// Target view.
        view_id: &'static str,
        /// URI handed to the app's router.
        uri: String,
    },
    /// `setTextViewText`.
    SetText {
        /// Target view.
        view_id: &'static str,
        /// New text.
        text: String,
    },
    /// `setViewVisibility`.
    SetVisibility {
        /// Target view.
        view_id: &'static str,
        /// New visibility.
        visibility: Visibility,
    },
    /// `setImageViewBitmap` with a decoded file.
    SetImageBitmap {
        /// Target view.
        view_id: &'static str,
        /// File the bitmap comes from.
        source: PathBuf,
        /// Container format of the file.
        format: ImageFormat,
        /// How the bitmap fills the view.
        scale: ScaleType,
        /// Encoded image bytes for the platform decoder.
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    /// `setImageViewResource` with a bundled drawable.
    SetImageResource {
        /// Target view.
        view_id: &'static str,
        /// Drawable resource name.
        resource: &'static str,
        /// How the drawable sits in the view.
        scale: ScaleType,
    },
}

impl ViewOp {
    /// The view this call targets.
    #[must_use]
    pub fn view_id(&self) -> &'static str {
        match self {
            Self::SetOnClickDeepLink { view_id, .. }
            | Self::SetText { view_id, .. }
            | Self::SetVisibility { view_id, .. }
            | Self::SetImageBitmap { view_id, .. }
            | Self::SetImageResource { view_id, .. } => view_id,
        }
    }
}

/// Setter calls for one layout, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteViews {
    /// Layout resource the calls apply to.
    pub layout: &'static str,
    /// Recorded calls.
    pub ops: Vec<ViewOp>,
}

impl RemoteViews {
    /// Start recording against `layout`.
    #[must_use]
    pub fn new(layout: &'static str) -> Self {
        Self {
            layout,
            ops: Vec::new(),
        }
    }

    /// Attach a deep-link tap target to `view_id`.
    pub fn set_on_click_deep_link(&mut self, view_id: &'static str, link: DeepLink) {
        self.ops.push(ViewOp::SetOnClickDeepLink {
            view_id,
            uri: link.uri(),
        });
    }

    /// Set the text of a `TextView`.
    pub fn set_text_view_text(&mut self, view_id: &'static str, text: impl Into<String>) {
        self.ops.push(ViewOp::SetText {
            view_id,
            text: text.into(),
        });
    }

    /// Show or hide a view.
    pub fn set_view_visibility(&mut self, view_id: &'static str, visibility: Visibility) {
        self.ops.push(ViewOp::SetVisibility {
            view_id,
            visibility,
        });
    }

    /// Fill an `ImageView` with a loaded map image, center-cropped.
    pub fn set_image_view_bitmap(&mut self, view_id: &'static str, image: &MapImage) {
        self.ops.push(ViewOp::SetImageBitmap {
            view_id,
            source: image.path.clone(),
            format: image.format,
            scale: ScaleType::CenterCrop,
            bytes: image.bytes.clone(),
        });
    }

    /// Show a bundled drawable in an `ImageView`.
    pub fn set_image_view_resource(
        &mut self,
        view_id: &'static str,
        resource: &'static str,
        scale: ScaleType,
    ) {
        self.ops.push(ViewOp::SetImageResource {
            view_id,
            resource,
            scale,
        });
    }

    /// Last text set on `view_id`.
    #[must_use]
    pub fn text_of(&self, view_id: &str) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::SetText { view_id: id, text } if *id == view_id => Some(text.as_str()),
            _ => None,
        })
    }

    /// Last visibility set on `view_id`.
    #[must_use]
    pub fn visibility_of(&self, view_id: &str) -> Option<Visibility> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::SetVisibility {
                view_id: id,
                visibility,
            } if *id == view_id => Some(*visibility),
            _ => None,
        })
    }

    /// Deep-link URI attached to `view_id`, if any.
    #[must_use]
    pub fn click_uri_of(&self, view_id: &str) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::SetOnClickDeepLink { view_id: id, uri } if *id == view_id => {
                Some(uri.as_str())
            }
            _ => None,
        })
    }

    /// All calls targeting `view_id`, in order.
    pub fn ops_for<'a>(&'a self, view_id: &'a str) -> impl Iterator<Item = &'a ViewOp> + 'a {
        self.ops.iter().filter(move |op| op.view_id() == view_id)
    }
}
