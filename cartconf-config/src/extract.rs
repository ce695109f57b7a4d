//! Settings extraction: run a config script and copy recognised values out.
//!
//! The script runs in a fresh context that is dropped before returning. If
//! it fails to compile or run, nothing is read and the settings are left
//! exactly as they were.

use cartconf_scripting::{ScriptContext, ScriptEngine, ScriptError};

use crate::reader::FieldReader;
use crate::settings::{CrtShader, Settings};

/// Vertex shader prologue rejected by WebGL 1.
const GLSL_110_VERTEX: &str = "\t\t#version 110";
/// Pixel shader prologue rejected by WebGL 1, with the precision line commented out.
const GLSL_110_PIXEL: &str = "\t\t#version 110\n\t\t//precision highp float;";

/// Knobs controlling which groups are extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Read `CRT_MONITOR` and the `CRT_SHADER` table.
    pub crt_shader: bool,
    /// Rewrite GLSL 1.10 shader prologues so WebGL accepts them.
    pub webgl_shaders: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            crt_shader: cfg!(feature = "crt-shader"),
            webgl_shaders: cfg!(target_family = "wasm"),
        }
    }
}

/// Result of one extraction.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// The script ran and recognised fields were copied.
    Applied,
    /// The script failed; settings are untouched.
    Aborted(ScriptError),
}

impl ExtractOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ExtractOutcome::Applied)
    }
}

/// Run `source` and overlay every present, well-typed field onto `settings`.
pub fn extract<E: ScriptEngine>(
    engine: &E,
    source: &str,
    settings: &mut Settings,
    options: ExtractOptions,
) -> ExtractOutcome {
    let mut ctx = match engine.create_context() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::warn!("Config extraction skipped: {e}");
            return ExtractOutcome::Aborted(e);
        }
    };

    if let Err(e) = engine.compile_and_run(&mut ctx, source) {
        log::warn!("Config script failed, keeping previous settings: {e}");
        return ExtractOutcome::Aborted(e);
    }

    apply(&ctx, settings, options);
    log::debug!("Config extraction applied");
    ExtractOutcome::Applied
}

/// Copy recognised globals out of an already-executed context.
pub fn apply<C: ScriptContext>(ctx: &C, settings: &mut Settings, options: ExtractOptions) {
    let globals = FieldReader::globals(ctx);

    globals.read("GIF_LENGTH", &mut settings.gif_length);
    globals.read("GIF_SCALE", &mut settings.gif_scale);
    globals.read("CHECK_NEW_VERSION", &mut settings.check_new_version);
    globals.read("NO_SOUND", &mut settings.no_sound);

    if options.crt_shader {
        globals.read("CRT_MONITOR", &mut settings.crt_monitor);
        read_crt_shader(&globals, &mut settings.shader);

        if options.webgl_shaders {
            patch_for_webgl(&mut settings.shader);
        }
    }

    globals.read("UI_SCALE", &mut settings.ui_scale);
    read_theme(&globals, settings);
}

fn read_crt_shader<C: ScriptContext>(globals: &FieldReader<'_, C>, shader: &mut CrtShader) {
    if let Some(table) = globals.table("CRT_SHADER") {
        table.read_opt("VERTEX", &mut shader.vertex);
        table.read_opt("PIXEL", &mut shader.pixel);
    }
}

fn read_theme<C: ScriptContext>(globals: &FieldReader<'_, C>, settings: &mut Settings) {
    let Some(theme) = globals.table("THEME") else {
        return;
    };

    if let Some(cursor) = theme.table("CURSOR") {
        let dest = &mut settings.theme.cursor;
        cursor.read("ARROW", &mut dest.arrow);
        cursor.read("HAND", &mut dest.hand);
        cursor.read("IBEAM", &mut dest.ibeam);
        cursor.read("PIXEL_PERFECT", &mut dest.pixel_perfect);
    }

    if let Some(code) = theme.table("CODE") {
        let dest = &mut settings.theme.code;
        for (name, color) in dest.colors_mut() {
            code.read(name, color);
        }
        code.read("SELECT", &mut dest.select);
        code.read("CURSOR", &mut dest.cursor);
        code.read("SHADOW", &mut dest.shadow);
        code.read("ALT_FONT", &mut dest.alt_font);
        code.read("MATCH_DELIMITERS", &mut dest.match_delimiters);
    }

    if let Some(touch) = theme.table("GAMEPAD.TOUCH") {
        touch.read("ALPHA", &mut settings.theme.gamepad.touch.alpha);
    }
}

/// Neutralise the `#version 110` line WebGL 1 rejects.
///
/// The vertex shader's leading tabs become `//`. The pixel shader also gets
/// its commented-out `precision highp float;` re-enabled. Sources that do not
/// start with the exact prologue are left alone.
pub fn patch_for_webgl(shader: &mut CrtShader) {
    if let Some(vertex) = shader.vertex.as_mut()
        && vertex.starts_with(GLSL_110_VERTEX)
    {
        vertex.replace_range(0..2, "//");
    }

    if let Some(pixel) = shader.pixel.as_mut()
        && pixel.starts_with(GLSL_110_PIXEL)
    {
        pixel.replace_range(0..2, "//");
        pixel.replace_range(17..19, "  ");
    }
}
