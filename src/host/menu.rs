//! Context menus built by menu-extension handlers.

use std::sync::Arc;

use crate::invocation::Invoked;

/// Callback run when a menu item is clicked.
pub type ClickHandler = Arc<dyn Fn() -> Invoked + Send + Sync>;

/// A menu under construction.
#[derive(Debug, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, configured by `build`.
    pub fn add_item(&mut self, build: impl FnOnce(&mut MenuItem)) -> &mut Self {
        let mut item = MenuItem::default();
        build(&mut item);
        self.items.push(item);
        self
    }

    /// All items, in insertion order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by title.
    pub fn find(&self, title: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.title == title)
    }

    /// Titles of all items in `section`.
    pub fn section_titles(&self, section: &str) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.section.as_deref() == Some(section))
            .map(|item| item.title.as_str())
            .collect()
    }
}

/// A single menu entry.
#[derive(Default)]
pub struct MenuItem {
    title: String,
    icon: Option<String>,
    section: Option<String>,
    on_click: Option<ClickHandler>,
    submenu: Option<Menu>,
}

impl MenuItem {
    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    /// Set the icon.
    pub fn set_icon(&mut self, icon: Option<impl Into<String>>) -> &mut Self {
        self.icon = icon.map(Into::into);
        self
    }

    /// Set the section the item is grouped under.
    pub fn set_section(&mut self, section: Option<impl Into<String>>) -> &mut Self {
        self.section = section.map(Into::into);
        self
    }

    /// Set the click handler.
    pub fn on_click(&mut self, handler: impl Fn() -> Invoked + Send + Sync + 'static) -> &mut Self {
        self.on_click = Some(Arc::new(handler));
        self
    }

    /// Attach a submenu and return it for population.
    pub fn set_submenu(&mut self) -> &mut Menu {
        self.submenu.get_or_insert_with(Menu::new)
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Icon.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Section.
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Submenu, if one was attached.
    pub fn submenu(&self) -> Option<&Menu> {
        self.submenu.as_ref()
    }

    /// Simulate a click. Returns `None` for items without a handler.
    pub fn click(&self) -> Option<Invoked> {
        self.on_click.as_ref().map(|handler| handler())
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("section", &self.section)
            .field("clickable", &self.on_click.is_some())
            .field("submenu", &self.submenu)
            .finish()
    }
}
