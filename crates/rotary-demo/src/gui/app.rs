use crate::config::{self, Config, Overrides};
use crate::events::AppEvent;
use crate::gui::surface::CairoSurface;
use crate::gui::theme;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use rotary::{FocusRequest, InputEvent, Key, Knob, KnobEvent, KnobOptions, Point};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppInit {
    pub config: Config,
    pub config_path: PathBuf,
    pub overrides: Overrides,
    pub rx: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub knob: Rc<RefCell<Knob>>,
    /// Options as configured, restored when the snap modifier is released.
    pub options: KnobOptions,
    pub config_path: PathBuf,
    pub overrides: Overrides,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Input(InputEvent),
    Focus(bool),
    Sensitive(bool),
    /// Shift held: snap and show tick marks while it is down.
    SnapModifier(bool),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn is_shift(key: gdk::Key) -> bool {
    key == gdk::Key::Shift_L || key == gdk::Key::Shift_R
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Rotary"),
            set_default_size: (init.config.window.width, init.config.window.height),
            add_css_class: "rotary-window",

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_content_width: size,
                set_content_height: size,
                set_halign: gtk::Align::Center,
                set_valign: gtk::Align::Center,
                set_focusable: true,
                add_css_class: "rotary-knob",

                connect_sensitive_notify[sender] => move |area| {
                    sender.input(AppMsg::Sensitive(area.is_sensitive()));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::Input(InputEvent::PointerPressed(Point::new(x, y))));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            let point = Point::new(x + dx, y + dy);
                            sender.input(AppMsg::Input(InputEvent::PointerDragged(point)));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            let point = Point::new(x + dx, y + dy);
                            sender.input(AppMsg::Input(InputEvent::PointerReleased(point)));
                        }
                    }
                },

                add_controller = gtk::EventControllerScroll::new(
                    gtk::EventControllerScrollFlags::BOTH_AXES,
                ) {
                    connect_scroll[sender] => move |controller, dx, dy| {
                        let horizontal = controller
                            .current_event_state()
                            .contains(gdk::ModifierType::SHIFT_MASK);
                        // some backends keep shift+wheel on the vertical axis
                        let dx = if horizontal && dx == 0.0 { dy } else { dx };
                        // gtk scrolls down with positive deltas, the knob turns clockwise
                        sender.input(AppMsg::Input(InputEvent::Scroll {
                            delta_x: -dx,
                            delta_y: -dy,
                            horizontal,
                        }));
                        glib::Propagation::Stop
                    }
                },

                add_controller = gtk::EventControllerKey {
                    connect_key_pressed[sender] => move |_, key, _, _| {
                        if is_shift(key) {
                            sender.input(AppMsg::SnapModifier(true));
                            return glib::Propagation::Proceed;
                        }
                        match key.name().and_then(|name| name.parse::<Key>().ok()) {
                            Some(key) => {
                                sender.input(AppMsg::Input(InputEvent::KeyPressed(key)));
                                glib::Propagation::Stop
                            }
                            None => glib::Propagation::Proceed,
                        }
                    },
                    connect_key_released[sender] => move |_, key, _, _| {
                        if is_shift(key) {
                            sender.input(AppMsg::SnapModifier(false));
                        }
                    }
                },

                add_controller = gtk::EventControllerFocus {
                    connect_enter[sender] => move |_| {
                        sender.input(AppMsg::Focus(true));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::Focus(false));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        theme::load_css(init.config.window.stylesheet.as_deref());

        let knob = match Knob::from_options(&init.config.knob) {
            Ok(knob) => knob,
            Err(e) => {
                log::error!("Invalid knob options, using defaults: {}", e);
                Knob::default()
            }
        };
        let size = knob.geometry().surface_size().ceil() as i32;
        let knob = Rc::new(RefCell::new(knob));

        let model = AppModel {
            knob: knob.clone(),
            options: init.config.knob.clone(),
            config_path: init.config_path.clone(),
            overrides: init.overrides,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let area = widgets.drawing_area.clone();
        knob.borrow_mut().subscribe(move |event| match event {
            KnobEvent::ValueChanged { current, .. } => log::info!("{}", current),
            KnobEvent::FocusChanged(focused) => log::debug!("Knob focused: {}", focused),
            KnobEvent::RedrawRequested => area.queue_draw(),
        });
        knob.borrow_mut()
            .set_enabled(widgets.drawing_area.is_sensitive());

        let knob_draw = knob.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let colors = theme::knob_palette(&drawing_area.style_context());
                let mut surface = CairoSurface::new(cr);
                if let Err(e) = rotary::render(&knob_draw.borrow(), &colors, &mut surface) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let rx = init.rx;
        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Input(event) => {
                let outcome = self.knob.borrow_mut().handle(event);
                match outcome.focus {
                    Some(FocusRequest::Grab) => {
                        self.drawing_area.grab_focus();
                    }
                    Some(FocusRequest::Release) => {
                        GtkWindowExt::set_focus(&self.root, None::<&gtk::Widget>);
                    }
                    None => {}
                }
            }
            AppMsg::Focus(focused) => self.knob.borrow_mut().set_focused(focused),
            AppMsg::Sensitive(sensitive) => self.knob.borrow_mut().set_enabled(sensitive),
            AppMsg::SnapModifier(held) => {
                let mut knob = self.knob.borrow_mut();
                knob.set_snap_to_ticks(held || self.options.snap_to_ticks);
                knob.set_show_tick_marks(held || self.options.show_tick_marks);
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(mut new_config) => {
                    self.overrides.apply(&mut new_config.knob);
                    match self.knob.borrow_mut().apply_options(&new_config.knob) {
                        Ok(()) => {
                            self.options = new_config.knob;
                            log::info!("Configuration reloaded");
                        }
                        Err(e) => log::error!("Failed to apply config: {}", e),
                    }
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
