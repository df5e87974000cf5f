//! Menu pages and access gating.
//!
//! Each dashboard has a fixed sidebar menu. A menu selection resolves to a
//! page, and [`dispatch`] decides from the session's [`AccessState`] whether
//! the page renders or shows its locked view. Gated pages never touch
//! storage while locked.

use serde::{Deserialize, Serialize};

/// Session-scoped authentication state.
///
/// Every session starts `Locked`. The only transition is `Locked -> Unlocked`
/// after a credential match; there is no way back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    #[default]
    Locked,
    Unlocked,
}

impl AccessState {
    /// Apply a successful credential match.
    #[must_use]
    pub const fn unlock(self) -> Self {
        Self::Unlocked
    }

    #[must_use]
    pub const fn is_unlocked(self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

/// A page in a dashboard menu.
pub trait MenuPage: Copy + Eq + 'static {
    /// All pages, in menu order.
    const ALL: &'static [Self];

    /// Label shown in the sidebar and accepted as a menu selection.
    fn label(self) -> &'static str;

    /// URL path the page is served from.
    fn path(self) -> &'static str;

    /// Whether the page requires an unlocked session.
    fn is_gated(self) -> bool;

    /// Resolve a menu selection by its exact label.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|page| page.label() == label)
    }

    /// Resolve the page served from a path.
    fn from_path(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|page| page.path() == path)
    }
}

/// Outcome of routing a page against the current access state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<P> {
    /// Render the page normally.
    Render(P),
    /// Render the page's locked view (warning or login form) with no data access.
    Locked(P),
}

/// Route a page for a session. Pure: no I/O, no side effects.
#[must_use]
pub fn dispatch<P: MenuPage>(page: P, access: AccessState) -> Dispatch<P> {
    if page.is_gated() && !access.is_unlocked() {
        Dispatch::Locked(page)
    } else {
        Dispatch::Render(page)
    }
}

/// Pages of the company dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalPage {
    Home,
    Projects,
    HrAnalytics,
    Finance,
    Students,
    Contact,
}

impl MenuPage for PortalPage {
    const ALL: &'static [Self] = &[
        Self::Home,
        Self::Projects,
        Self::HrAnalytics,
        Self::Finance,
        Self::Students,
        Self::Contact,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Projects => "Projects",
            Self::HrAnalytics => "HR Analytics",
            Self::Finance => "Finance",
            Self::Students => "Students",
            Self::Contact => "Contact",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Projects => "/projects",
            Self::HrAnalytics => "/hr-analytics",
            Self::Finance => "/finance",
            Self::Students => "/students",
            Self::Contact => "/contact",
        }
    }

    fn is_gated(self) -> bool {
        matches!(self, Self::Students)
    }
}

/// Pages of the TecHealth patient dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClinicPage {
    Home,
    Data,
    ViewData,
    Masters,
    Analysis,
    Video,
}

impl MenuPage for ClinicPage {
    const ALL: &'static [Self] = &[
        Self::Home,
        Self::Data,
        Self::ViewData,
        Self::Masters,
        Self::Analysis,
        Self::Video,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Data => "Data",
            Self::ViewData => "View Data",
            Self::Masters => "Masters",
            Self::Analysis => "Analysis",
            Self::Video => "Video",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Data => "/data",
            Self::ViewData => "/view-data",
            Self::Masters => "/masters",
            Self::Analysis => "/analysis",
            Self::Video => "/video",
        }
    }

    fn is_gated(self) -> bool {
        !matches!(self, Self::Home)
    }
}

/// One sidebar entry, ready for a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// Build the sidebar entries with `current` marked active.
#[must_use]
pub fn menu<P: MenuPage>(current: P) -> Vec<MenuItem> {
    P::ALL
        .iter()
        .map(|&page| MenuItem {
            label: page.label(),
            path: page.path(),
            active: page == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_access_is_locked() {
        assert_eq!(AccessState::default(), AccessState::Locked);
        assert!(!AccessState::default().is_unlocked());
    }

    #[test]
    fn test_unlock_is_one_way() {
        let access = AccessState::Locked.unlock();
        assert_eq!(access, AccessState::Unlocked);
        assert_eq!(access.unlock(), AccessState::Unlocked);
    }

    #[test]
    fn test_dispatch_public_page_ignores_access() {
        assert_eq!(
            dispatch(PortalPage::Finance, AccessState::Locked),
            Dispatch::Render(PortalPage::Finance)
        );
        assert_eq!(
            dispatch(ClinicPage::Home, AccessState::Locked),
            Dispatch::Render(ClinicPage::Home)
        );
    }

    #[test]
    fn test_dispatch_gated_page() {
        assert_eq!(
            dispatch(PortalPage::Students, AccessState::Locked),
            Dispatch::Locked(PortalPage::Students)
        );
        assert_eq!(
            dispatch(PortalPage::Students, AccessState::Unlocked),
            Dispatch::Render(PortalPage::Students)
        );
        for &page in ClinicPage::ALL {
            if page != ClinicPage::Home {
                assert_eq!(
                    dispatch(page, AccessState::Locked),
                    Dispatch::Locked(page)
                );
            }
        }
    }

    #[test]
    fn test_from_label_is_exact() {
        assert_eq!(
            PortalPage::from_label("HR Analytics"),
            Some(PortalPage::HrAnalytics)
        );
        assert_eq!(ClinicPage::from_label("View Data"), Some(ClinicPage::ViewData));
        assert_eq!(ClinicPage::from_label("view data"), None);
        assert_eq!(PortalPage::from_label("Blog"), None);
    }

    #[test]
    fn test_paths_are_unique() {
        for &page in ClinicPage::ALL {
            assert_eq!(ClinicPage::from_path(page.path()), Some(page));
        }
        for &page in PortalPage::ALL {
            assert_eq!(PortalPage::from_path(page.path()), Some(page));
        }
    }

    #[test]
    fn test_menu_marks_current_page() {
        let items = menu(ClinicPage::Masters);
        assert_eq!(items.len(), 6);
        let active: Vec<_> = items.iter().filter(|i| i.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active.first().map(|i| i.label), Some("Masters"));
    }
}
