use crate::bindings::UiBindings;
use crate::clock::Clock;
use crate::configuration::Settings;
use crate::controllers::{
    ContactFormController, MenuController, NavigationController, Reaction, RevealController,
    SubmissionOutcome, SubmitStep,
};
use crate::dom::{Dom, DomEffect, ElementRef, IntersectionEntry, KeyEvent, ObserverKind};
use crate::features::{apply_theme, stored_theme, Analytics, ScrollToTop, ThemeSwitcher};
use crate::storage::KeyValueStore;
use crate::submission_client::SubmissionClient;
use anyhow::Context;
use chrono::Datelike;
use secrecy::Secret;
use std::time::Duration;

/// The page behavior, wired together.
///
/// The host owns the event loop: it forwards browser events to the `on_*` methods, in the order
/// they happen, and calls `on_tick` once `next_deadline` has passed. Every handler returns whether
/// the browser's default action for the event must be suppressed.
///
/// For one event, controllers run in a fixed registration order and each one sees the page as left
/// by the previous one.
pub struct Application<D: Dom> {
    dom: D,
    bindings: UiBindings,
    clock: Box<dyn Clock>,
    storage: Box<dyn KeyValueStore>,
    client: SubmissionClient,
    access_key: Secret<String>,
    navigation: NavigationController,
    menu: MenuController,
    reveal: RevealController,
    contact: ContactFormController,
    analytics: Analytics,
    theme_switcher: Option<ThemeSwitcher>,
    scroll_to_top: Option<ScrollToTop>,
}

impl<D: Dom> Application<D> {
    pub fn build(
        settings: Settings,
        dom: D,
        storage: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, anyhow::Error> {
        let client = SubmissionClient::new(
            settings.submission.base_url.clone(),
            settings.submission.timeout(),
        )
        .context("Failed to build the submission client")?;

        let bindings = UiBindings::discover(&dom);
        let interface = &settings.interface;
        let features = &settings.features;

        let theme_switcher = features
            .theme_switcher
            .then(|| ThemeSwitcher::new(stored_theme(storage.as_ref())));
        let scroll_to_top = features.scroll_to_top.then(|| {
            ScrollToTop::new(interface.scroll_to_top_threshold, interface.scroll_throttle())
        });

        Ok(Self {
            navigation: NavigationController::new(interface),
            menu: MenuController::new(),
            reveal: RevealController::new(),
            contact: ContactFormController::new(interface.status_clear_delay()),
            analytics: Analytics::new(features.analytics),
            theme_switcher,
            scroll_to_top,
            access_key: settings.submission.access_key,
            dom,
            bindings,
            clock,
            storage,
            client,
        })
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutable access for the host, to mirror what the visitor does (typing, scrolling, focus).
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn bindings(&self) -> &UiBindings {
        &self.bindings
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn contact_form(&self) -> &ContactFormController {
        &self.contact
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_open()
    }

    /// The earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        [self.navigation.next_deadline(), self.contact.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    #[tracing::instrument(name = "Page loaded", skip(self))]
    pub fn on_load(&mut self) -> bool {
        let mut reaction = Reaction::none();

        if let Some(year) = self.bindings.year {
            reaction.effects.push(DomEffect::SetText {
                target: year,
                text: chrono::Local::now().year().to_string(),
            });
        }
        let theme = stored_theme(self.storage.as_ref());
        reaction.effects.extend(apply_theme(&self.bindings, theme));

        let reaction = reaction
            .merge(self.navigation.on_load(&self.dom, &self.bindings))
            .merge(self.reveal.on_load(&self.bindings));
        self.apply(reaction)
    }

    pub fn on_scroll(&mut self) -> bool {
        let now = self.clock.now();
        let reaction = self.navigation.on_scroll(&self.dom, &self.bindings, now);
        let mut prevented = self.apply(reaction);
        if let Some(scroll_to_top) = self.scroll_to_top.as_mut() {
            let reaction = scroll_to_top.on_scroll(&self.dom, &self.bindings, now);
            prevented |= self.apply(reaction);
        }
        prevented
    }

    pub fn on_click(&mut self, target: ElementRef) -> bool {
        // Only look the link up when there is someone to tell.
        let nav_link = self
            .analytics
            .is_enabled()
            .then(|| self.dom.closest(target, ".nav-link"))
            .flatten();
        if let Some(link) = nav_link {
            let href = self.dom.attribute(link, "href").unwrap_or_default();
            self.analytics
                .track_event("nav_click", &[("href", href.as_str())]);
        }

        let reaction = self.menu.on_click(&self.dom, &self.bindings, target);
        let mut prevented = self.apply(reaction);

        let reaction = self.navigation.on_click(&self.dom, &self.bindings, target);
        prevented |= self.apply(reaction);

        if let Some(switcher) = self.theme_switcher.as_mut() {
            let reaction =
                switcher.on_click(&self.dom, &self.bindings, target, self.storage.as_mut());
            prevented |= self.apply(reaction);
        }
        if let Some(scroll_to_top) = self.scroll_to_top.as_ref() {
            let reaction = scroll_to_top.on_click(&self.dom, &self.bindings, target);
            prevented |= self.apply(reaction);
        }
        prevented
    }

    pub fn on_keydown(&mut self, key: &KeyEvent) -> bool {
        let reaction = self.menu.on_keydown(&self.dom, &self.bindings, key);
        self.apply(reaction)
    }

    pub fn on_input(&mut self, target: ElementRef) -> bool {
        let reaction = match &self.bindings.contact {
            Some(contact) => self.contact.on_input(&self.dom, contact, target),
            None => return false,
        };
        self.apply(reaction)
    }

    pub fn on_blur(&mut self, target: ElementRef) -> bool {
        let reaction = match &self.bindings.contact {
            Some(contact) => self.contact.on_blur(&self.dom, contact, target),
            None => return false,
        };
        self.apply(reaction)
    }

    pub fn on_intersection(&mut self, observer: ObserverKind, entries: &[IntersectionEntry]) -> bool {
        let reaction = self.reveal.on_intersection(&self.dom, observer, entries);
        self.apply(reaction)
    }

    /// Runs every timer that is due.
    pub fn on_tick(&mut self) -> bool {
        let now = self.clock.now();
        let mut reaction = self.navigation.on_tick(&self.dom, &self.bindings, now);
        if let Some(contact) = &self.bindings.contact {
            reaction = reaction.merge(self.contact.on_tick(contact, now));
        }
        self.apply(reaction)
    }

    /// Handles a submit of the contact form.
    ///
    /// Validation failures stay on the page. Any failure past validation is logged and reported
    /// to the visitor with a generic message only. The submit control is restored on every path
    /// that disabled it.
    #[tracing::instrument(name = "Contact form submitted", skip(self))]
    pub async fn on_submit(&mut self) -> bool {
        let contact = match &self.bindings.contact {
            Some(contact) => contact.clone(),
            None => return false,
        };

        let request = match self
            .contact
            .begin_submit(&self.dom, &contact, &self.access_key)
        {
            SubmitStep::Invalid(reaction) => return self.apply(reaction),
            SubmitStep::Ready { request, reaction } => {
                self.apply(reaction);
                request
            }
        };

        let outcome = match self.client.submit(&request).await {
            Ok(receipt) => {
                tracing::info!(
                    service.message = receipt.message.as_deref().unwrap_or_default(),
                    "Contact form delivered"
                );
                self.analytics.track_event("contact_form_submitted", &[]);
                SubmissionOutcome::Success
            }
            Err(error) => {
                tracing::error!(
                    error.cause_chain = ?error,
                    error.message = %error,
                    "Failed to submit the contact form"
                );
                SubmissionOutcome::Failure(error.to_string())
            }
        };

        let now = self.clock.now();
        let reaction = self.contact.finish_submit(&contact, &outcome, now);
        self.apply(reaction);
        true
    }

    fn apply(&mut self, reaction: Reaction) -> bool {
        self.dom.apply_all(reaction.effects);
        reaction.prevent_default
    }
}
