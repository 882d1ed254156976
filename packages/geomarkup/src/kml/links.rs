//! Links to external resources and their refresh behaviour.

use super::base::{BaseObject, BASE_OBJECT};
use crate::config::NameSpaces;
use crate::error::Result;
use crate::registry::{
    build_boxed, AttrValue, DecodeContext, Kwargs, Registry, RegistryItem, XmlClass, XmlEnum,
    XmlObject, XmlType,
};

pub static LINK: XmlClass = XmlClass {
    name: "Link",
    tag: "Link",
    parent: Some(&BASE_OBJECT),
    factory: Some(build_boxed::<Link>),
};

/// `Icon` shares every descriptor with `Link` and only changes the tag.
pub static ICON: XmlClass = XmlClass {
    name: "Icon",
    tag: "Icon",
    parent: Some(&LINK),
    factory: Some(build_boxed::<Icon>),
};

/// Time-based refresh mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    OnChange,
    OnInterval,
    OnExpire,
}

impl XmlEnum for RefreshMode {
    const NAME: &'static str = "RefreshMode";
    const ALL: &'static [Self] = &[Self::OnChange, Self::OnInterval, Self::OnExpire];

    fn as_str(&self) -> &'static str {
        match self {
            Self::OnChange => "onChange",
            Self::OnInterval => "onInterval",
            Self::OnExpire => "onExpire",
        }
    }
}

/// View-based refresh mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRefreshMode {
    Never,
    OnRequest,
    OnStop,
    OnRegion,
}

impl XmlEnum for ViewRefreshMode {
    const NAME: &'static str = "ViewRefreshMode";
    const ALL: &'static [Self] = &[Self::Never, Self::OnRequest, Self::OnStop, Self::OnRegion];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::OnRequest => "onRequest",
            Self::OnStop => "onStop",
            Self::OnRegion => "onRegion",
        }
    }
}

/// Location of a remote resource.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    pub base: BaseObject,
    pub href: Option<String>,
    pub refresh_mode: Option<RefreshMode>,
    pub refresh_interval: Option<f64>,
    pub view_refresh_mode: Option<ViewRefreshMode>,
    pub view_refresh_time: Option<f64>,
    pub view_bound_scale: Option<f64>,
    pub view_format: Option<String>,
    pub http_query: Option<String>,
}

impl Link {
    /// Create a link to `href`.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }
}

impl XmlObject for Link {
    fn class(&self) -> &'static XmlClass {
        &LINK
    }

    fn ns(&self) -> &str {
        &self.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "href" => self.href.as_deref().map(AttrValue::Text),
            "refresh_mode" => self.refresh_mode.map(|mode| AttrValue::Enum(mode.as_str())),
            "refresh_interval" => self.refresh_interval.map(AttrValue::Float),
            "view_refresh_mode" => self
                .view_refresh_mode
                .map(|mode| AttrValue::Enum(mode.as_str())),
            "view_refresh_time" => self.view_refresh_time.map(AttrValue::Float),
            "view_bound_scale" => self.view_bound_scale.map(AttrValue::Float),
            "view_format" => self.view_format.as_deref().map(AttrValue::Text),
            "http_query" => self.http_query.as_deref().map(AttrValue::Text),
            _ => self.base.attr(name),
        }
    }

    fn is_empty(&self) -> bool {
        self.href.is_none()
    }
}

impl XmlType for Link {
    fn xml_class() -> &'static XmlClass {
        &LINK
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            base: BaseObject::from_kwargs(ctx, &mut kwargs),
            href: kwargs.take_text("href"),
            refresh_mode: kwargs.take_enum("refresh_mode"),
            refresh_interval: kwargs.take_float("refresh_interval"),
            view_refresh_mode: kwargs.take_enum("view_refresh_mode"),
            view_refresh_time: kwargs.take_float("view_refresh_time"),
            view_bound_scale: kwargs.take_float("view_bound_scale"),
            view_format: kwargs.take_text("view_format"),
            http_query: kwargs.take_text("http_query"),
        })
    }
}

/// Image used by an icon style or overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Icon {
    pub link: Link,
}

impl XmlObject for Icon {
    fn class(&self) -> &'static XmlClass {
        &ICON
    }

    fn ns(&self) -> &str {
        self.link.ns()
    }

    fn name_spaces(&self) -> &NameSpaces {
        self.link.name_spaces()
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        self.link.attr(name)
    }

    fn is_empty(&self) -> bool {
        self.link.is_empty()
    }
}

impl XmlType for Icon {
    fn xml_class() -> &'static XmlClass {
        &ICON
    }

    fn from_kwargs(ctx: &DecodeContext, kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            link: Link::from_kwargs(ctx, kwargs)?,
        })
    }
}

pub(super) fn register(registry: &mut Registry) {
    registry.register(&LINK, RegistryItem::text("href", "href"));
    registry.register(
        &LINK,
        RegistryItem::enumeration::<RefreshMode>("refresh_mode", "refreshMode"),
    );
    registry.register(&LINK, RegistryItem::float("refresh_interval", "refreshInterval"));
    registry.register(
        &LINK,
        RegistryItem::enumeration::<ViewRefreshMode>("view_refresh_mode", "viewRefreshMode"),
    );
    registry.register(&LINK, RegistryItem::float("view_refresh_time", "viewRefreshTime"));
    registry.register(&LINK, RegistryItem::float("view_bound_scale", "viewBoundScale"));
    registry.register(&LINK, RegistryItem::text("view_format", "viewFormat"));
    registry.register(&LINK, RegistryItem::text("http_query", "httpQuery"));
}
