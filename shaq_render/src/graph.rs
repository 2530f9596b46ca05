//! Render-graph scheduler (spec §4.8): recomputes each shader's current-frame dependency list and
//! topologically sorts the shader set by depth-limited DFS, reporting and omitting any shader
//! caught in a cycle rather than failing the whole frame.

use shaq_host::{Session, ShaderLookup};
use shaq_sel::types::{TextureDescriptor, Type};
use shaq_sel::vm::Vm;
use tracing::warn;

use crate::shader::Shader;

/// Resolves `output_of`/`last_output_of` by linear name lookup over the shader set being
/// scheduled this pass. Dependency discovery only runs on reload and when a shader's SEL
/// expressions could have changed, so a linear scan over a small (≈dozens) shader list is cheap
/// enough not to warrant a persistent name index. Also used by callers outside this module (the
/// per-frame uniform update pass) that need the same name-to-descriptor resolution.
pub struct NameLookup<'a> {
    names: &'a [String],
}

impl<'a> NameLookup<'a> {
    pub fn new(names: &'a [String]) -> Self {
        Self { names }
    }
}

impl ShaderLookup for NameLookup<'_> {
    fn current_output_of(&mut self, shader_name: &str) -> TextureDescriptor {
        match self.names.iter().position(|name| name == shader_name) {
            Some(index) => TextureDescriptor::CurrentOutputOf { index: index as u32 },
            None => {
                warn!("output_of references an unknown shader: {}", shader_name);
                TextureDescriptor::Error
            }
        }
    }

    fn last_output_of(&mut self, shader_name: &str) -> TextureDescriptor {
        match self.names.iter().position(|name| name == shader_name) {
            Some(index) => TextureDescriptor::LastOutputOf { index: index as u32 },
            None => {
                warn!("last_output_of references an unknown shader: {}", shader_name);
                TextureDescriptor::Error
            }
        }
    }
}

/// Recomputes every shader's `shader_depends` list, then returns a topological render order.
/// Call on reload and whenever a shader's texture-typed uniform expressions could have changed
/// (spec §4.8 step 1).
pub fn recompute_render_order(shaders: &mut [Shader<'_>], vm: &mut Vm, session: &mut Session) -> Vec<usize> {
    let names: Vec<String> = shaders.iter().map(|shader| shader.name.clone()).collect();

    for shader in shaders.iter_mut() {
        shader.shader_depends.clear();

        for uniform in shader.uniforms.iter_mut().filter(|uniform| uniform.declared_type == Type::Texture) {
            let mut lookup = NameLookup::new(&names);
            let mut host = session.for_frame(&mut lookup);
            let value = match vm.eval(&mut uniform.exe, &mut host, true) {
                Ok(value) => value,
                Err(err) => {
                    panic!("runtime VM error evaluating texture uniform {}: {}", uniform.name, err);
                }
            };
            // Safety: `uniform.exe.result_type` is `Type::Texture`, matching how `value` was
            // produced.
            let descriptor = unsafe { TextureDescriptor::from(value.texture) };
            if let TextureDescriptor::CurrentOutputOf { index } = descriptor {
                shader.shader_depends.push(index as usize);
            }
        }

        for target in &shader.render_after {
            match names.iter().position(|name| name == target) {
                Some(index) => shader.shader_depends.push(index),
                None => warn!(
                    "shader {} has render_after pointing at unknown shader {}",
                    shader.name, target
                ),
            }
        }

        shader.shader_depends.sort_unstable();
        shader.shader_depends.dedup();
    }

    topological_order(shaders)
}

fn topological_order(shaders: &[Shader<'_>]) -> Vec<usize> {
    let max_depth = shaders.len();
    let mut visited = vec![false; shaders.len()];
    let mut order = Vec::with_capacity(shaders.len());

    for start in 0..shaders.len() {
        if visited[start] {
            continue;
        }
        let mut path = Vec::new();
        if !visit(start, shaders, &mut visited, &mut path, &mut order, max_depth) {
            warn!(
                "dependency cycle detected; omitting shader {} from render order",
                shaders[start].name
            );
        }
    }

    order
}

fn visit(
    index: usize,
    shaders: &[Shader<'_>],
    visited: &mut [bool],
    path: &mut Vec<usize>,
    order: &mut Vec<usize>,
    max_depth: usize,
) -> bool {
    if visited[index] {
        return true;
    }
    if path.len() >= max_depth || path.contains(&index) {
        return false;
    }

    path.push(index);
    for &dep in &shaders[index].shader_depends {
        if !visited[dep] && !visit(dep, shaders, visited, path, order, max_depth) {
            path.pop();
            return false;
        }
    }
    path.pop();

    visited[index] = true;
    order.push(index);
    true
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use shaq_host::Session;
    use shaq_sel::vm::Vm;

    use super::*;

    fn shader_depending_on(name: &str, depends_on: &[usize]) -> Shader<'static> {
        let mut shader = Shader::new(name.to_owned(), format!("{name}.frag"), IVec2::new(64, 64));
        shader.shader_depends = depends_on.to_vec();
        shader
    }

    #[test]
    fn linear_chain_orders_dependencies_before_dependents() {
        let mut shaders = vec![
            shader_depending_on("a", &[]),
            shader_depending_on("b", &[0]),
            shader_depending_on("c", &[1]),
        ];
        let order = topological_order(&mut shaders);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn cycle_is_detected_and_both_members_omitted() {
        let mut shaders = vec![shader_depending_on("a", &[1]), shader_depending_on("b", &[0])];
        let order = topological_order(&mut shaders);
        assert!(order.is_empty());
    }

    #[test]
    fn recompute_render_order_walks_texture_uniforms() {
        let src: &'static str = "output_of(\"base\")";
        let exe = shaq_sel::compile_expr(src).unwrap();

        let base = Shader::new("base".to_owned(), "base.frag".to_owned(), IVec2::new(64, 64));
        let mut dependent = Shader::new("dependent".to_owned(), "dependent.frag".to_owned(), IVec2::new(64, 64));
        dependent.uniforms.push(crate::shader::Uniform::new("src".to_owned(), Type::Texture, exe));

        let mut shaders = vec![base, dependent];
        let mut vm = Vm::new();
        let mut session = Session::new(Some(1), 4, 1 << 16);

        let order = recompute_render_order(&mut shaders, &mut vm, &mut session);
        let base_pos = order.iter().position(|&i| i == 0).unwrap();
        let dependent_pos = order.iter().position(|&i| i == 1).unwrap();
        assert!(base_pos < dependent_pos);
    }
}
