use once_cell::sync::Lazy;
use portfolio::clock::ManualClock;
use portfolio::configuration::{base_configuration, Settings};
use portfolio::dom::{Dom, ElementRef, InMemoryDom, NodeBuilder};
use portfolio::startup::Application;
use portfolio::storage::InMemoryStorage;
use portfolio::telemetry;
use std::time::Duration;
use wiremock::MockServer;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // The sink is part of the type returned by `get_subscriber`, hence the two branches.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        telemetry::init_subscriber(subscriber);
    } else {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        telemetry::init_subscriber(subscriber);
    }
});

/// Handles on the interesting elements of the fixture page.
pub(crate) struct Page {
    pub(crate) nav: ElementRef,
    pub(crate) nav_toggle: ElementRef,
    pub(crate) nav_menu: ElementRef,
    /// Links to `#home`, `#about`, `#projects` and `#contact`, in that order.
    pub(crate) nav_links: Vec<ElementRef>,
    pub(crate) brand: ElementRef,
    pub(crate) hero_title: ElementRef,
    pub(crate) project_cards: Vec<ElementRef>,
    pub(crate) lazy_image: ElementRef,
    pub(crate) name: ElementRef,
    pub(crate) email: ElementRef,
    pub(crate) message: ElementRef,
    pub(crate) name_group: ElementRef,
    pub(crate) name_error: ElementRef,
    pub(crate) email_group: ElementRef,
    pub(crate) email_error: ElementRef,
    pub(crate) message_group: ElementRef,
    pub(crate) message_error: ElementRef,
    pub(crate) submit: ElementRef,
    pub(crate) status: ElementRef,
    pub(crate) year: ElementRef,
    pub(crate) theme_toggle: ElementRef,
    pub(crate) scroll_to_top: ElementRef,
}

pub(crate) struct TestApp {
    pub(crate) app: Application<InMemoryDom>,
    pub(crate) submission_server: MockServer,
    pub(crate) clock: ManualClock,
    pub(crate) page: Page,
}

impl TestApp {
    pub(crate) fn dom(&self) -> &InMemoryDom {
        self.app.dom()
    }

    pub(crate) fn fill_form(&mut self, name: &str, email: &str, message: &str) {
        let (name_input, email_input, message_input) =
            (self.page.name, self.page.email, self.page.message);
        let dom = self.app.dom_mut();
        dom.set_value(name_input, name);
        dom.set_value(email_input, email);
        dom.set_value(message_input, message);
    }

    pub(crate) fn fill_valid_form(&mut self) {
        self.fill_form(
            "Ada Lovelace",
            "ada@example.com",
            "I would love to talk about your projects.",
        );
    }

    pub(crate) async fn submit_form(&mut self) -> bool {
        self.app.on_submit().await
    }

    pub(crate) fn scroll_to(&mut self, scroll_y: f64) -> bool {
        self.app.dom_mut().set_scroll_y(scroll_y);
        self.app.on_scroll()
    }

    /// Moves the clock forward and fires whatever timers came due.
    pub(crate) fn advance(&mut self, by: Duration) {
        self.clock.advance(by);
        self.app.on_tick();
    }

    pub(crate) fn text(&self, element: ElementRef) -> String {
        self.dom().text(element)
    }

    pub(crate) fn value(&self, element: ElementRef) -> String {
        self.dom().value(element)
    }

    pub(crate) fn has_class(&self, element: ElementRef, class: &str) -> bool {
        self.dom().has_class(element, class)
    }

    pub(crate) fn active_links(&self) -> Vec<ElementRef> {
        self.page
            .nav_links
            .iter()
            .copied()
            .filter(|link| self.has_class(*link, "active"))
            .collect()
    }
}

/// Every optional feature switched on, submissions pointed at a mock server.
pub(crate) async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Same as [`spawn_app`], with a last chance to tweak the settings.
pub(crate) async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed. All other invocations
    // will instead skip execution.
    Lazy::force(&TRACING);

    // Launch a mock server to stand in for the form relay service
    let submission_server = MockServer::start().await;

    let configuration = {
        let mut c = base_configuration().expect("Failed to read configuration.");
        c.submission.base_url = submission_server.uri();
        c.submission.access_key = secrecy::Secret::new("test-access-key".to_string());
        c.features.theme_switcher = true;
        c.features.analytics = true;
        c.features.scroll_to_top = true;
        customise(&mut c);
        c
    };

    let (dom, page) = build_page();
    let clock = ManualClock::new();
    let mut app = Application::build(
        configuration,
        dom,
        Box::new(InMemoryStorage::new()),
        Box::new(clock.clone()),
    )
    .expect("Failed to build application");
    app.on_load();

    TestApp {
        app,
        submission_server,
        clock,
        page,
    }
}

/// A one page portfolio: fixed 70px nav, four stacked sections, the contact form at the bottom.
///
/// | section   | top  | height |
/// |-----------|------|--------|
/// | #home     | 0    | 600    |
/// | #about    | 600  | 600    |
/// | #projects | 1200 | 800    |
/// | #contact  | 2000 | 800    |
fn build_page() -> (InMemoryDom, Page) {
    let mut dom = InMemoryDom::new();
    let body = dom.body();

    let nav = dom.append(body, NodeBuilder::new("nav").class("site-nav").layout(0.0, 70.0));
    let brand = dom.append(
        nav,
        NodeBuilder::new("a").class("nav-brand").attr("href", "#"),
    );
    let nav_toggle = dom.append(
        nav,
        NodeBuilder::new("button")
            .class("nav-toggle")
            .attr("aria-expanded", "false"),
    );
    let nav_menu = dom.append(nav, NodeBuilder::new("ul").class("nav-menu"));
    let nav_links = ["#home", "#about", "#projects", "#contact"]
        .into_iter()
        .map(|href| {
            let item = dom.append(nav_menu, NodeBuilder::new("li"));
            dom.append(
                item,
                NodeBuilder::new("a").class("nav-link").attr("href", href),
            )
        })
        .collect();

    let home = dom.append(
        body,
        NodeBuilder::new("section").id("home").layout(0.0, 600.0),
    );
    let hero_title = dom.append(home, NodeBuilder::new("h2").class("section-title"));

    let about = dom.append(
        body,
        NodeBuilder::new("section").id("about").layout(600.0, 600.0),
    );
    dom.append(about, NodeBuilder::new("h2").class("section-title"));
    dom.append(about, NodeBuilder::new("div").class("skill-category"));
    dom.append(about, NodeBuilder::new("div").class("skill-category"));
    dom.append(about, NodeBuilder::new("div").class("timeline-item"));

    let projects = dom.append(
        body,
        NodeBuilder::new("section").id("projects").layout(1200.0, 800.0),
    );
    dom.append(projects, NodeBuilder::new("h2").class("section-title"));
    let project_cards = (0..3)
        .map(|_| dom.append(projects, NodeBuilder::new("article").class("project-card")))
        .collect();
    let lazy_image = dom.append(
        projects,
        NodeBuilder::new("img").attr("data-src", "/images/project.webp"),
    );

    let contact = dom.append(
        body,
        NodeBuilder::new("section").id("contact").layout(2000.0, 800.0),
    );
    dom.append(contact, NodeBuilder::new("div").class("contact-info"));
    let form = dom.append(contact, NodeBuilder::new("form").id("contact-form"));
    let mut field = |id: &str, tag: &str| {
        let group = dom.append(form, NodeBuilder::new("div").class("form-group"));
        let input = dom.append(group, NodeBuilder::new(tag).id(id));
        let error = dom.append(group, NodeBuilder::new("span").class("error-message"));
        (group, input, error)
    };
    let (name_group, name, name_error) = field("name", "input");
    let (email_group, email, email_error) = field("email", "input");
    let (message_group, message, message_error) = field("message", "textarea");
    let submit = dom.append(
        form,
        NodeBuilder::new("button")
            .attr("type", "submit")
            .text("Send Message"),
    );
    let status = dom.append(contact, NodeBuilder::new("div").id("form-status"));

    let footer = dom.append(body, NodeBuilder::new("footer"));
    let year = dom.append(footer, NodeBuilder::new("span").id("year"));
    let theme_toggle = dom.append(body, NodeBuilder::new("button").class("theme-toggle"));
    let scroll_to_top = dom.append(body, NodeBuilder::new("button").class("scroll-to-top"));

    let page = Page {
        nav,
        nav_toggle,
        nav_menu,
        nav_links,
        brand,
        hero_title,
        project_cards,
        lazy_image,
        name,
        email,
        message,
        name_group,
        name_error,
        email_group,
        email_error,
        message_group,
        message_error,
        submit,
        status,
        year,
        theme_toggle,
        scroll_to_top,
    };
    (dom, page)
}
