//! Every element the page behavior touches, looked up once.
//!
//! Controllers never query the document for the elements they own: they receive them through
//! `UiBindings`. A missing element shows up as `None` (or an empty list) and the behavior depending
//! on it quietly does nothing.
use crate::controllers::REVEAL_GROUPS;
use crate::dom::{Dom, ElementRef};
use crate::domain::FormField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBinding {
    pub element: ElementRef,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBindings {
    pub field: FormField,
    pub input: ElementRef,
    /// The enclosing `.form-group`, which carries the visual error state.
    pub group: Option<ElementRef>,
    /// The `.error-message` inside the group.
    pub error: Option<ElementRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFormBindings {
    pub form: ElementRef,
    pub status: Option<ElementRef>,
    pub submit: Option<ElementRef>,
    pub fields: Vec<FieldBindings>,
}

impl ContactFormBindings {
    fn discover(dom: &dyn Dom) -> Option<Self> {
        let form = dom.select("#contact-form")?;
        let fields = FormField::ALL
            .iter()
            .map(|field| {
                let input = dom.select_within(form, &format!("#{}", field.input_id()))?;
                let group = dom.closest(input, ".form-group");
                let error = group.and_then(|group| dom.select_within(group, ".error-message"));
                Some(FieldBindings {
                    field: *field,
                    input,
                    group,
                    error,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            form,
            status: dom.select("#form-status"),
            submit: dom.select_within(form, "button[type=\"submit\"]"),
            fields,
        })
    }

    pub fn field(&self, field: FormField) -> Option<&FieldBindings> {
        self.fields.iter().find(|binding| binding.field == field)
    }

    pub fn field_for_input(&self, input: ElementRef) -> Option<&FieldBindings> {
        self.fields.iter().find(|binding| binding.input == input)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiBindings {
    pub root: Option<ElementRef>,
    pub body: Option<ElementRef>,
    pub nav: Option<ElementRef>,
    pub nav_toggle: Option<ElementRef>,
    pub nav_menu: Option<ElementRef>,
    pub nav_links: Vec<ElementRef>,
    pub sections: Vec<SectionBinding>,
    pub contact: Option<ContactFormBindings>,
    pub year: Option<ElementRef>,
    /// Fade-in targets, one list per reveal selector.
    pub reveal_groups: Vec<Vec<ElementRef>>,
    pub lazy_images: Vec<ElementRef>,
    pub theme_toggle: Option<ElementRef>,
    pub scroll_to_top: Option<ElementRef>,
}

impl UiBindings {
    pub fn discover(dom: &dyn Dom) -> Self {
        let sections = dom
            .select_all("section[id]")
            .into_iter()
            .filter_map(|element| {
                let id = dom.attribute(element, "id")?;
                Some(SectionBinding { element, id })
            })
            .collect();

        Self {
            root: dom.select("html"),
            body: dom.select("body"),
            nav: dom.select(".site-nav"),
            nav_toggle: dom.select(".nav-toggle"),
            nav_menu: dom.select(".nav-menu"),
            nav_links: dom.select_all(".nav-link"),
            sections,
            contact: ContactFormBindings::discover(dom),
            year: dom.select("#year"),
            reveal_groups: REVEAL_GROUPS
                .iter()
                .map(|selector| dom.select_all(selector))
                .collect(),
            lazy_images: dom.select_all("img[data-src]"),
            theme_toggle: dom.select(".theme-toggle"),
            scroll_to_top: dom.select(".scroll-to-top"),
        }
    }
}
