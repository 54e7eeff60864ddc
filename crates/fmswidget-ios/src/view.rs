//! A SwiftUI-shaped view tree.
//!
//! The Swift extension walks this tree and emits the matching SwiftUI
//! views. Only the handful of views and modifiers the two widgets use are
//! modelled.

use std::path::PathBuf;

use fmswidget::{ImageFormat, MapImage};
use serde::Serialize;

/// Dynamic Type text styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Font {
    /// `.headline`
    Headline,
    /// `.subheadline`
    Subheadline,
    /// `.title2`
    Title2,
    /// `.caption`
    Caption,
    /// `.caption2`
    Caption2,
}

/// Font weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Weight {
    /// `.semibold`
    Semibold,
    /// `.bold`
    Bold,
}

/// Stack and overlay alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    /// `.leading`
    Leading,
    /// `.center`
    Center,
    /// `.bottomLeading`
    BottomLeading,
}

/// Edges a padding applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Edges {
    /// All four edges.
    All,
    /// `.top`
    Top,
    /// `.bottom`
    Bottom,
    /// `.vertical`
    Vertical,
}

/// How an image fills its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentMode {
    /// Cover the frame, cropping overflow.
    Fill,
    /// Fit inside the frame.
    Fit,
}

/// Named system colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseColor {
    /// `Color.gray`
    Gray,
    /// `Color.white`
    White,
}

/// A system color with opacity in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    /// Base color.
    pub base: BaseColor,
    /// Opacity, 0..=100.
    pub opacity: u8,
}

impl Color {
    /// Opaque gray.
    pub const GRAY: Self = Self::new(BaseColor::Gray, 100);

    /// Build a color at `opacity` percent.
    #[must_use]
    pub const fn new(base: BaseColor, opacity: u8) -> Self {
        Self { base, opacity }
    }
}

/// Where an image's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImageSource {
    /// An SF Symbol.
    System {
        /// Symbol name.
        name: &'static str,
    },
    /// An image file from the app group container.
    File {
        /// File path.
        path: PathBuf,
        /// Container format.
        format: ImageFormat,
        /// Encoded bytes for `UIImage(data:)`.
        #[serde(skip)]
        bytes: Vec<u8>,
    },
}

impl From<&MapImage> for ImageSource {
    fn from(image: &MapImage) -> Self {
        Self::File {
            path: image.path.clone(),
            format: image.format,
            bytes: image.bytes.clone(),
        }
    }
}

/// View kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// Vertical stack.
    VStack {
        /// Horizontal alignment of children.
        alignment: Alignment,
        /// Children, top to bottom.
        children: Vec<View>,
    },
    /// Horizontal stack.
    HStack {
        /// Children, leading to trailing.
        children: Vec<View>,
    },
    /// Overlay stack.
    ZStack {
        /// Alignment of children.
        alignment: Alignment,
        /// Children, back to front.
        children: Vec<View>,
    },
    /// Static text.
    Text {
        /// The string shown.
        content: String,
    },
    /// Image.
    Image {
        /// Pixel source.
        source: ImageSource,
    },
    /// Solid color fill.
    Color {
        /// Fill color.
        color: Color,
    },
    /// Flexible space.
    Spacer,
}

/// View modifiers, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    /// `.font(_)`
    Font(Font),
    /// `.fontWeight(_)`
    FontWeight(Weight),
    /// `.foregroundColor(_)`
    ForegroundColor(Color),
    /// `.lineLimit(_)`
    LineLimit(u32),
    /// `.padding(_, _)`; `None` is the system default amount.
    Padding {
        /// Padded edges.
        edges: Edges,
        /// Amount in points.
        points: Option<u16>,
    },
    /// `.background(_)`
    Background(Color),
    /// `.cornerRadius(_)`
    CornerRadius(u16),
    /// Fixed `.frame(width:height:)`.
    Frame {
        /// Width in points.
        width: u16,
        /// Height in points.
        height: u16,
    },
    /// `.frame(maxWidth: .infinity)`
    MaxWidth,
    /// `.frame(maxWidth: .infinity, maxHeight: .infinity)`
    MaxSize,
    /// `.resizable()`
    Resizable,
    /// `.aspectRatio(contentMode:)`
    AspectRatio(ContentMode),
    /// `.id(_)` row identity inside a `ForEach`.
    Id(String),
}

/// A view and its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    /// The view itself.
    pub node: Node,
    /// Modifiers, innermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl From<Node> for View {
    fn from(node: Node) -> Self {
        Self {
            node,
            modifiers: Vec::new(),
        }
    }
}

impl View {
    /// `Text(content)`
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
        .into()
    }

    /// `VStack(alignment:) { children }`
    #[must_use]
    pub fn vstack(alignment: Alignment, children: Vec<View>) -> Self {
        Node::VStack {
            alignment,
            children,
        }
        .into()
    }

    /// `HStack { children }`
    #[must_use]
    pub fn hstack(children: Vec<View>) -> Self {
        Node::HStack { children }.into()
    }

    /// `ZStack(alignment:) { children }`
    #[must_use]
    pub fn zstack(alignment: Alignment, children: Vec<View>) -> Self {
        Node::ZStack {
            alignment,
            children,
        }
        .into()
    }

    /// `Image(...)`
    #[must_use]
    pub fn image(source: ImageSource) -> Self {
        Node::Image { source }.into()
    }

    /// A color used as a view.
    #[must_use]
    pub fn color(color: Color) -> Self {
        Node::Color { color }.into()
    }

    /// `Spacer()`
    #[must_use]
    pub fn spacer() -> Self {
        Node::Spacer.into()
    }

    /// Append a modifier.
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// `.font(_)`
    #[must_use]
    pub fn font(self, font: Font) -> Self {
        self.modifier(Modifier::Font(font))
    }

    /// `.fontWeight(_)`
    #[must_use]
    pub fn font_weight(self, weight: Weight) -> Self {
        self.modifier(Modifier::FontWeight(weight))
    }

    /// `.foregroundColor(_)`
    #[must_use]
    pub fn foreground_color(self, color: Color) -> Self {
        self.modifier(Modifier::ForegroundColor(color))
    }

    /// `.padding(edges, points)`
    #[must_use]
    pub fn padding(self, edges: Edges, points: Option<u16>) -> Self {
        self.modifier(Modifier::Padding { edges, points })
    }

    /// Direct children of a stack; empty for leaf views.
    #[must_use]
    pub fn children(&self) -> &[View] {
        match &self.node {
            Node::VStack { children, .. }
            | Node::HStack { children }
            | Node::ZStack { children, .. } => children,
            _ => &[],
        }
    }

    /// Text content if this is a text view.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match &self.node {
            Node::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Whether `modifier` is applied to this view.
    #[must_use]
    pub fn has_modifier(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Every text in the tree, depth-first.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |view| {
            if let Some(text) = view.text_content() {
                out.push(text);
            }
        });
        out
    }

    /// First view in the tree, depth-first, matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&View) -> bool) -> Option<&View> {
        self.find_dyn(&predicate)
    }

    /// First text view with exactly `content`.
    #[must_use]
    pub fn find_text(&self, content: &str) -> Option<&View> {
        self.find(|view| view.text_content() == Some(content))
    }

    fn find_dyn(&self, predicate: &dyn Fn(&View) -> bool) -> Option<&View> {
        if predicate(self) {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(|child| child.find_dyn(predicate))
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a View)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}
