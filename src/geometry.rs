//! Geometry queries built on top of a [`Document`].

use glam::DVec2;

use crate::host::Document;
use crate::types::Bounds;

/// Top-left corner of `element` in document coordinates.
///
/// Elements without client rects sit at the origin.
pub fn document_offset<D: Document + ?Sized>(doc: &D, element: &D::Element) -> DVec2 {
    match doc.bounding_client_rect(element) {
        Some(rect) => rect.min + doc.scroll_position(),
        None => DVec2::ZERO,
    }
}

/// Border box of `element` in document coordinates.
pub fn element_bounds<D: Document + ?Sized>(doc: &D, element: &D::Element) -> Bounds {
    let size = doc
        .bounding_client_rect(element)
        .map(|r| r.size())
        .unwrap_or(DVec2::ZERO);
    Bounds::from_origin_size(document_offset(doc, element), size)
}

/// Whether `element` or any ancestor below `<body>` is `fixed` or `sticky`.
pub fn is_fixed_element<D: Document + ?Sized>(doc: &D, element: &D::Element) -> bool {
    let mut node = Some(element.clone());
    while let Some(current) = node {
        let fixed = doc.computed_position(&current).is_some_and(|p| {
            let p = p.to_ascii_lowercase();
            p.contains("fixed") || p.contains("sticky")
        });
        if fixed {
            return true;
        }
        node = doc.parent_element(&current);
    }
    false
}

/// Whether `element` cannot be seen: entirely above or left of the
/// document origin, or hidden by CSS.
pub fn is_not_visible<D: Document + ?Sized>(doc: &D, element: &D::Element) -> bool {
    let bounds = element_bounds(doc, element);
    bounds.bottom().raw() <= 0.0 || bounds.right().raw() <= 0.0 || !doc.check_visibility(element)
}

/// Top-left corner that centres a box of `size` inside `viewport`.
pub fn centered(viewport: DVec2, size: DVec2) -> DVec2 {
    (viewport - size) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Page {
        rects: HashMap<u32, Bounds>,
        positions: HashMap<u32, &'static str>,
        parents: HashMap<u32, u32>,
        hidden: Vec<u32>,
        scroll: DVec2,
    }

    impl Document for Page {
        type Element = u32;

        fn query_selector(&self, _selector: &str) -> Option<u32> {
            None
        }

        fn bounding_client_rect(&self, element: &u32) -> Option<Bounds> {
            self.rects.get(element).copied()
        }

        fn scroll_position(&self) -> DVec2 {
            self.scroll
        }

        fn computed_position(&self, element: &u32) -> Option<String> {
            Some(self.positions.get(element).copied().unwrap_or("static").to_string())
        }

        fn parent_element(&self, element: &u32) -> Option<u32> {
            self.parents.get(element).copied()
        }

        fn check_visibility(&self, element: &u32) -> bool {
            !self.hidden.contains(element)
        }
    }

    #[test]
    fn offset_adds_scroll() {
        let mut page = Page { scroll: DVec2::new(5.0, 100.0), ..Default::default() };
        page.rects.insert(1, Bounds::new(20.0, 10.0, 30.0, 40.0));

        assert_eq!(document_offset(&page, &1), DVec2::new(15.0, 120.0));
        let b = element_bounds(&page, &1);
        assert_eq!(b.top().raw(), 120.0);
        assert_eq!(b.bottom().raw(), 160.0);
        assert_eq!(b.right().raw(), 45.0);
    }

    #[test]
    fn offset_without_client_rects_is_origin() {
        let page = Page { scroll: DVec2::new(5.0, 100.0), ..Default::default() };
        assert_eq!(document_offset(&page, &7), DVec2::ZERO);
        assert_eq!(element_bounds(&page, &7).size(), DVec2::ZERO);
    }

    #[test]
    fn fixed_ancestor_makes_element_fixed() {
        let mut page = Page::default();
        page.parents.insert(3, 2);
        page.parents.insert(2, 1);
        page.positions.insert(1, "sticky");
        assert!(is_fixed_element(&page, &3));

        page.positions.insert(1, "relative");
        assert!(!is_fixed_element(&page, &3));

        page.positions.insert(3, "FIXED");
        assert!(is_fixed_element(&page, &3));
    }

    #[test]
    fn visibility_checks_geometry_and_css() {
        let mut page = Page::default();
        page.rects.insert(1, Bounds::new(10.0, 10.0, 10.0, 10.0));
        page.rects.insert(2, Bounds::new(-50.0, 10.0, 10.0, 50.0));
        page.rects.insert(3, Bounds::new(10.0, -20.0, 10.0, 10.0));
        page.rects.insert(4, Bounds::new(10.0, 10.0, 10.0, 10.0));
        page.hidden.push(4);

        assert!(!is_not_visible(&page, &1));
        assert!(is_not_visible(&page, &2), "bottom edge exactly at 0");
        assert!(is_not_visible(&page, &3));
        assert!(is_not_visible(&page, &4));
        assert!(is_not_visible(&page, &99), "no client rects");
    }

    #[test]
    fn centered_box() {
        let c = centered(DVec2::new(1200.0, 900.0), DVec2::new(400.0, 400.0));
        assert_eq!(c, DVec2::new(400.0, 250.0));
    }
}
