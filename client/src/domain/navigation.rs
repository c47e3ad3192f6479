//! Dashboard navigation sections.

/// One entry in the dashboard sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DashboardSection {
    /// Label shown to the user.
    pub name: &'static str,
    /// Page path.
    pub href: &'static str,
}

/// Sidebar entries in display order.
pub const DASHBOARD_SECTIONS: [DashboardSection; 7] = [
    DashboardSection {
        name: "Home",
        href: "/dashboard",
    },
    DashboardSection {
        name: "Businesses",
        href: "/dashboard/businesses",
    },
    DashboardSection {
        name: "Posts",
        href: "/dashboard/posts",
    },
    DashboardSection {
        name: "News",
        href: "/dashboard/news",
    },
    DashboardSection {
        name: "Due Diligence",
        href: "/dashboard/due-diligence",
    },
    DashboardSection {
        name: "Messages",
        href: "/dashboard/messages",
    },
    DashboardSection {
        name: "Search",
        href: "/dashboard/search",
    },
];

/// Section highlighted for `pathname`. Only exact matches count, so nested
/// pages such as `/dashboard/businesses/42` highlight nothing.
pub fn active_section(pathname: &str) -> Option<&'static DashboardSection> {
    DASHBOARD_SECTIONS
        .iter()
        .find(|section| section.href == pathname)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/dashboard", Some("Home"))]
    #[case("/dashboard/due-diligence", Some("Due Diligence"))]
    #[case("/dashboard/businesses/42", None)]
    #[case("/login", None)]
    fn active_section_requires_exact_match(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(active_section(path).map(|section| section.name), expected);
    }
}
