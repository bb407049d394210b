//! Replay of a recorded page session
//!
//! A script describes one page lifetime: the page that loaded and the
//! visitor's steps in order. Steps drive the same monitors and wrappers the
//! page would, on a virtual clock, so a replay is instant and repeatable.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use beacon_core::{
    ConversionGoal, ConversionSpec, Emitter, HookRegistry, NavigationTiming, VisitorProfile,
    initialize_heatmaps,
};
use beacon_engage::{
    DwellMonitor, FieldElement, FieldFocus, FormSubmission, MonitorConfig, ScrollMetrics,
    ScrollMonitor, TrackedCta, TrackedForm,
};
use beacon_experiments::{
    Assigner, Experiment, FixedRandom, MemoryStore, RandomSource, ThreadRandom, Variant,
};
use serde::Deserialize;
use tracing::{debug, warn};

/// A recorded page session.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub page: Option<PageInfo>,

    /// Navigation timing reported once the page loaded
    #[serde(default)]
    pub timing: Option<NavigationTiming>,

    /// Identify the visitor with the session recorders on load
    #[serde(default)]
    pub heatmaps: bool,

    /// Full document height in pixels
    pub scroll_height: f64,

    /// Viewport height in pixels
    pub viewport_height: f64,

    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantSpec {
    pub name: String,
    pub weight: f64,
}

/// One visitor action or the passage of time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Scroll position changed
    Scroll { top: f64 },
    /// Time passes with the page open
    Wait {
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    /// A CTA was activated
    Click {
        location: String,
        text: String,
        #[serde(default)]
        href: Option<String>,
        #[serde(default)]
        conversion: Option<String>,
        #[serde(default)]
        value: Option<f64>,
        /// A custom handler took over navigation
        #[serde(default)]
        handled: bool,
    },
    /// A form field gained or lost focus
    Field {
        form: String,
        element: FieldElement,
        focus: FieldFocus,
    },
    /// A form was submitted
    Submit {
        form: String,
        #[serde(default)]
        conversion: Option<String>,
        #[serde(default)]
        value: Option<f64>,
        #[serde(default)]
        fields: BTreeMap<String, String>,
    },
    /// A component rendered an experiment
    Assign {
        experiment: String,
        variants: Vec<VariantSpec>,
        /// Fixed unit draw in `[0, 1)`; random when absent
        #[serde(default)]
        draw: Option<f64>,
    },
    /// A component reported an error
    Error { message: String },
    /// The page unloaded
    Exit,
}

/// What a replay did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub elapsed: Duration,
    pub exited: bool,
    /// (experiment, variant) in render order
    pub assignments: Vec<(String, String)>,
}

/// Kind and value for a conversion named in a script.
///
/// Catalogue goals carry their default value unless one is given.
fn conversion_spec(kind: &str, value: Option<f64>) -> ConversionSpec {
    match ConversionGoal::parse(kind) {
        Some(goal) => {
            let mut spec = ConversionSpec::from(goal);
            if value.is_some() {
                spec.value = value;
            }
            spec
        }
        None => ConversionSpec::new(kind, value),
    }
}

fn rounded_secs(elapsed: Duration) -> u64 {
    let millis = elapsed.as_millis();
    u64::try_from((millis + 500) / 1000).unwrap_or(u64::MAX)
}

/// Plays a script against an emitter.
pub struct Replayer {
    emitter: Arc<Emitter>,
    scroll: ScrollMonitor,
    dwell: DwellMonitor,
    poll_interval: Duration,
    clock: Duration,
    next_poll: Duration,
    store: Arc<MemoryStore>,
}

impl Replayer {
    pub fn new(emitter: Arc<Emitter>, monitors: &MonitorConfig) -> Self {
        let poll_interval = monitors.poll_interval.max(Duration::from_millis(1));
        Self {
            scroll: ScrollMonitor::with_thresholds(
                emitter.clone(),
                monitors.scroll_thresholds.iter().copied(),
            ),
            dwell: DwellMonitor::with_thresholds(
                emitter.clone(),
                monitors.time_thresholds.iter().copied(),
            ),
            emitter,
            poll_interval,
            clock: Duration::ZERO,
            next_poll: poll_interval,
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn run(mut self, script: &ReplayScript, hooks: &HookRegistry) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();

        if script.heatmaps {
            initialize_heatmaps(hooks, &VisitorProfile::anonymous());
        }
        if let Some(page) = &script.page {
            self.emitter
                .page_view(&page.path, page.query.as_deref(), &page.title);
        }
        if let Some(timing) = script.timing {
            self.emitter.performance(timing);
        }

        for (i, step) in script.steps.iter().enumerate() {
            debug!(step = i, ?step, "Replaying step");
            summary.steps += 1;
            match step {
                Step::Scroll { top } => {
                    let metrics = ScrollMetrics::new(*top, script.scroll_height, script.viewport_height);
                    self.scroll.observe(metrics);
                }
                Step::Wait { duration } => self.advance(*duration),
                Step::Click {
                    location,
                    text,
                    href,
                    conversion,
                    value,
                    handled,
                } => {
                    let mut cta = TrackedCta::new(self.emitter.clone(), location, text);
                    if let Some(href) = href {
                        cta = cta.with_href(href);
                    }
                    if let Some(kind) = conversion {
                        cta = cta.with_conversion(conversion_spec(kind, *value));
                    }
                    if *handled {
                        cta.activate_with(|| ());
                    } else {
                        cta.activate();
                    }
                }
                Step::Field {
                    form,
                    element,
                    focus,
                } => {
                    TrackedForm::new(self.emitter.clone(), form).field_event(element, *focus);
                }
                Step::Submit {
                    form,
                    conversion,
                    value,
                    fields,
                } => {
                    let mut tracked = TrackedForm::new(self.emitter.clone(), form);
                    if let Some(kind) = conversion {
                        tracked = tracked.with_conversion(conversion_spec(kind, *value));
                    }
                    let submission = fields
                        .iter()
                        .fold(FormSubmission::new(), |s, (k, v)| s.with_field(k, v));
                    tracked.submit_with(&submission, |_| ());
                }
                Step::Assign {
                    experiment,
                    variants,
                    draw,
                } => {
                    let experiment = Experiment::new(
                        experiment.clone(),
                        variants
                            .iter()
                            .map(|v| Variant::named(v.name.clone(), v.weight))
                            .collect(),
                    )?;
                    let random: Arc<dyn RandomSource> = match draw {
                        Some(unit) => Arc::new(FixedRandom::new(*unit)),
                        None => Arc::new(ThreadRandom),
                    };
                    let assigner = Assigner::new(self.store.clone(), self.emitter.clone())
                        .with_random(random);
                    let variant = assigner.assign(&experiment);
                    summary
                        .assignments
                        .push((experiment.name().to_string(), variant.name.clone()));
                }
                Step::Error { message } => {
                    self.emitter.exception(&std::io::Error::other(message.clone()), None);
                }
                Step::Exit => {
                    self.dwell.exit_after(rounded_secs(self.clock));
                    summary.exited = true;
                    let ignored = script.steps.len() - i - 1;
                    if ignored > 0 {
                        warn!(ignored, "Steps after page exit ignored");
                    }
                    break;
                }
            }
        }

        summary.elapsed = self.clock;
        Ok(summary)
    }

    /// Move the virtual clock, running every dwell poll that falls due.
    fn advance(&mut self, by: Duration) {
        self.clock += by;
        while self.next_poll <= self.clock {
            self.dwell.check_elapsed(rounded_secs(self.next_poll));
            self.next_poll += self.poll_interval;
        }
    }
}
