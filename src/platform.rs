use std::time::Instant;

use anyhow::{format_err, Error};
use euclid::point2;
use glutin::{
    event::{
        ElementState, Event, KeyboardInput, MouseButton as GlutinMouseButton, VirtualKeyCode,
        WindowEvent,
    },
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
    ContextBuilder, GlRequest,
};

use crate::{
    gl,
    input::{InputEvent, Key, MouseButton},
};

/// Logs `error` and ends the process without unwinding back into the event
/// loop.
pub fn fatal(error: Error) -> ! {
    log::error!("{:#}", error);
    std::process::exit(1)
}

/// Opens the window and runs the event loop forever. `f` builds the per
/// frame callback once the GL context exists; the callback receives the
/// seconds since the previous frame and the input events gathered since then.
pub fn run<F, U>(title: &str, size: (u32, u32), f: F) -> !
where
    F: FnOnce(&mut gl::Context) -> Result<U, Error>,
    U: FnMut(f32, &[InputEvent], &mut gl::Context) -> Result<(), Error> + 'static,
{
    env_logger::init();
    let event_loop = EventLoop::new();
    let wb = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(glutin::dpi::LogicalSize::new(size.0, size.1))
        .with_resizable(false);
    let windowed_context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(glutin::Api::OpenGlEs, (2, 0)))
        .build_windowed(wb, &event_loop)
        .map_err(|e| format_err!("Could not create window: {}", e))
        .and_then(|context| unsafe {
            context
                .make_current()
                .map_err(|(_, e)| format_err!("Could not make GL context current: {}", e))
        })
        .unwrap_or_else(|e| fatal(e));

    let mut gl_context =
        gl::Context::from_glow_context(glow::Context::from_loader_function(|addr| {
            windowed_context.get_proc_address(addr)
        }));

    let mut frame_fn = f(&mut gl_context).unwrap_or_else(|e| fatal(e));

    let mut input_events = Vec::new();
    let mut last_time = Instant::now();
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::MainEventsCleared => windowed_context.window().request_redraw(),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                log::info!("Window closed");
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(key),
                            state,
                            ..
                        },
                    ..
                } => {
                    if let Some(key) = get_key(key) {
                        match state {
                            ElementState::Pressed => {
                                input_events.push(InputEvent::KeyDown(key));
                            }
                            ElementState::Released => {
                                input_events.push(InputEvent::KeyUp(key));
                            }
                        }
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let button = get_mouse_button(button);
                    match state {
                        ElementState::Pressed => {
                            input_events.push(InputEvent::MouseDown(button));
                        }
                        ElementState::Released => {
                            input_events.push(InputEvent::MouseUp(button));
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let scale_factor = windowed_context.window().scale_factor();
                    let position = position.to_logical::<f32>(scale_factor);
                    input_events.push(InputEvent::MouseMove(point2(position.x, position.y)));
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = (now - last_time).as_micros() as f32 / 1_000_000.;
                last_time = now;
                if let Err(e) = frame_fn(dt, &input_events, &mut gl_context) {
                    fatal(e);
                }
                input_events.clear();
                if let Err(e) = windowed_context.swap_buffers() {
                    fatal(format_err!("Could not swap buffers: {}", e));
                }
                unsafe { gl_context.maintain() };
            }
            _ => {}
        }
    })
}

fn get_key(vk: VirtualKeyCode) -> Option<Key> {
    match vk {
        VirtualKeyCode::Left => Some(Key::Left),
        VirtualKeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

fn get_mouse_button(button: GlutinMouseButton) -> MouseButton {
    match button {
        GlutinMouseButton::Left => MouseButton::Left,
        GlutinMouseButton::Middle => MouseButton::Middle,
        GlutinMouseButton::Right => MouseButton::Right,
        GlutinMouseButton::Other(b) => MouseButton::Other(b),
    }
}
