//! Project-file loader (spec §6 "Project file"): walks an INI-formatted file section by section,
//! each section naming one shader, compiling every `attribute`/`uniform` right-hand-side as a SEL
//! expression.
//!
//! Grounded on `game_server::config::Config::from_file` for the read-whole-file-then-parse shape;
//! the format itself (sections, `;` comments, repeatable keys) is INI rather than TOML because
//! the spec requires both, so this is the one dependency this crate adds beyond the teacher's own
//! stack (`ini`, noted in `DESIGN.md`).

use std::path::Path;

use glam::IVec2;
use ini::Ini;
use shaq_host::SessionArena;
use shaq_render::shader::Uniform;
use shaq_render::Shader;
use shaq_sel::types::Type;
use shaq_sel::vm::Vm;
use shaq_sel::CompileError;
use tracing::warn;

use crate::null_host::NullHost;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("failed to read or parse project file: {0}")]
    Ini(#[from] ini::Error),
}

/// Loads every `[section]` of `path` as a shader definition, compiling each attribute/uniform
/// expression with text copied into `arena`. Per spec §4.9, a single uniform/attribute failing to
/// compile is logged and skipped rather than aborting the whole load; a shader missing its
/// mandatory `source` attribute is skipped entirely.
pub fn load_project<'arena>(
    path: impl AsRef<Path>,
    arena: &'arena SessionArena,
    default_resolution: IVec2,
) -> Result<Vec<Shader<'arena>>, ProjectError> {
    let ini = Ini::load_from_file(path)?;
    let mut shaders = Vec::new();

    for (section_name, properties) in ini.iter() {
        let Some(name) = section_name else { continue };

        let mut source_path = None;
        let mut output_format = None;
        let mut output_resolution = None;
        let mut render_after = Vec::new();
        let mut uniforms = Vec::new();

        for (key, value) in properties.iter() {
            let words: Vec<&str> = key.split_whitespace().collect();
            match words.as_slice() {
                ["attribute", "source"] => {
                    source_path = eval_const_str(arena, value, name, key);
                }
                ["attribute", "output_format"] => {
                    output_format = eval_const_int(arena, value, name, key);
                }
                ["attribute", "output_resolution"] => {
                    output_resolution = eval_const_ivec2(arena, value, name, key);
                }
                ["attribute", "render_after"] => {
                    if let Some(target) = eval_const_str(arena, value, name, key) {
                        render_after.push(target);
                    }
                }
                ["uniform", type_keyword, uniform_name] => {
                    if let Some(declared_type) = glsl_type(type_keyword) {
                        if let Some(uniform) =
                            compile_uniform(arena, uniform_name, declared_type, value, name, key)
                        {
                            uniforms.push(uniform);
                        }
                    } else {
                        warn!("shader {} has uniform {} with unrecognised type {}", name, key, type_keyword);
                    }
                }
                _ => warn!("shader {} has unrecognised project-file key: {}", name, key),
            }
        }

        let Some(source_path) = source_path else {
            warn!("shader {} has no source attribute; skipping", name);
            continue;
        };

        let mut shader = Shader::new(
            name.to_owned(),
            source_path,
            output_resolution.unwrap_or(default_resolution),
        );
        if let Some(format) = output_format {
            shader.output_format = shaq_render::backend::GlFormat(format as u32);
        }
        shader.render_after = render_after;
        shader.uniforms = uniforms;
        shaders.push(shader);
    }

    Ok(shaders)
}

fn glsl_type(keyword: &str) -> Option<Type> {
    Some(match keyword {
        "bool" => Type::Bool,
        "int" => Type::Int,
        "uint" => Type::Uint,
        "float" => Type::Float,
        "vec2" => Type::Vec2,
        "vec3" => Type::Vec3,
        "vec4" => Type::Vec4,
        "ivec2" => Type::IVec2,
        "ivec3" => Type::IVec3,
        "ivec4" => Type::IVec4,
        "mat2" => Type::Mat2,
        "mat3" => Type::Mat3,
        "mat4" => Type::Mat4,
        "sampler2D" => Type::Texture,
        _ => return None,
    })
}

fn compile_uniform<'arena>(
    arena: &'arena SessionArena,
    uniform_name: &str,
    declared_type: Type,
    expr_src: &str,
    shader_name: &str,
    key: &str,
) -> Option<Uniform<'arena>> {
    let src = arena.alloc_str(expr_src);
    match shaq_sel::compile_expr(src) {
        Ok(exe) if exe.result_type == declared_type => {
            Some(Uniform::new(uniform_name.to_owned(), declared_type, exe))
        }
        Ok(exe) => {
            warn!(
                "shader {} uniform {} declared as {} but expression has type {}",
                shader_name, key, declared_type, exe.result_type
            );
            None
        }
        Err(err) => {
            log_compile_error(shader_name, key, &err);
            None
        }
    }
}

fn eval_const_str(arena: &SessionArena, expr_src: &str, shader_name: &str, key: &str) -> Option<String> {
    let value = eval_const(arena, expr_src, Type::Str, shader_name, key)?;
    // Safety: `eval_const` only returns `Some` when the expression's checked type is `Type::Str`.
    Some(unsafe { value.str_view.as_str() }.to_owned())
}

fn eval_const_int(arena: &SessionArena, expr_src: &str, shader_name: &str, key: &str) -> Option<i32> {
    let value = eval_const(arena, expr_src, Type::Int, shader_name, key)?;
    Some(unsafe { value.i })
}

fn eval_const_ivec2(arena: &SessionArena, expr_src: &str, shader_name: &str, key: &str) -> Option<IVec2> {
    let value = eval_const(arena, expr_src, Type::IVec2, shader_name, key)?;
    Some(unsafe { value.ivec2 })
}

fn eval_const(
    arena: &SessionArena,
    expr_src: &str,
    expected_type: Type,
    shader_name: &str,
    key: &str,
) -> Option<shaq_sel::types::SelValue> {
    let src = arena.alloc_str(expr_src);
    let mut exe = match shaq_sel::compile_expr(src) {
        Ok(exe) => exe,
        Err(err) => {
            log_compile_error(shader_name, key, &err);
            return None;
        }
    };
    if exe.qualifier != shaq_sel::ast::Qualifier::Const {
        warn!("shader {} attribute {} must be a const expression", shader_name, key);
        return None;
    }
    if exe.result_type != expected_type {
        warn!(
            "shader {} attribute {} expected type {} but got {}",
            shader_name, key, expected_type, exe.result_type
        );
        return None;
    }
    let mut vm = Vm::new();
    let mut host = NullHost;
    match vm.eval(&mut exe, &mut host, false) {
        Ok(value) => Some(value),
        Err(err) => {
            panic!("runtime VM error evaluating shader {shader_name} attribute {key}: {err}");
        }
    }
}

fn log_compile_error(shader_name: &str, key: &str, err: &CompileError) {
    warn!("shader {} failed to compile {}: {}", shader_name, key, err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_source_attribute_skips_the_shader() {
        let mut file = tempfile_with_contents(
            "[main]\nuniform float x = 1.0\n",
        );
        let arena = SessionArena::new();
        let shaders = load_project(file.path(), &arena, IVec2::new(1280, 720)).unwrap();
        assert!(shaders.is_empty());
        file.flush().ok();
    }

    #[test]
    fn loads_a_minimal_shader_section() {
        let file = tempfile_with_contents(
            "[main]\nattribute source = \"main.frag\"\nuniform float gain = 1.0 + 2.0\n",
        );
        let arena = SessionArena::new();
        let shaders = load_project(file.path(), &arena, IVec2::new(1280, 720)).unwrap();
        assert_eq!(shaders.len(), 1);
        assert_eq!(shaders[0].name, "main");
        assert_eq!(shaders[0].source_path, "main.frag");
        assert_eq!(shaders[0].uniforms.len(), 1);
        assert_eq!(shaders[0].uniforms[0].name, "gain");
    }

    fn tempfile_with_contents(contents: &str) -> tempfile_shim::NamedTempFile {
        tempfile_shim::NamedTempFile::new(contents)
    }

    /// A tiny `std::fs`-backed stand-in so these tests don't need the `tempfile` crate just to
    /// write one throwaway file to the OS temp directory.
    mod tempfile_shim {
        use std::fs;
        use std::path::{Path, PathBuf};

        pub struct NamedTempFile {
            path: PathBuf,
        }

        impl NamedTempFile {
            pub fn new(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                let unique = format!("shaq_project_test_{:p}.ini", contents.as_ptr());
                path.push(unique);
                fs::write(&path, contents).expect("write temp project file");
                Self { path }
            }

            pub fn path(&self) -> &Path {
                &self.path
            }

            pub fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl Drop for NamedTempFile {
            fn drop(&mut self) {
                let _ = fs::remove_file(&self.path);
            }
        }
    }
}
