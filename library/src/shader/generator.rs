use crate::expression::operation::broadcast;
use crate::expression::{Origin, Session, ValueType, Var};

/// Uniform holding the surface size in pixels.
pub const RESOLUTION_UNIFORM: &str = "resolution";

/// Fixed coordinate stage: maps a surface coordinate to a 0..1 UV.
pub fn vertex_source() -> String {
    format!(
        "uniform float2 {0};\n\nfloat2 vertex_uv(float2 coord) {{\n    return coord / {0};\n}}\n",
        RESOLUTION_UNIFORM
    )
}

const INDENT: &str = "    ";

/// The two stages of one compute program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Both stages as one compilation unit, vertex stage first.
    pub fn linked(&self) -> String {
        format!("{}\n{}", self.vertex, self.fragment)
    }
}

/// Lowers every variable of `session` to one program whose output is `result`.
///
/// Variables are declared in registration order. Nothing is reordered or
/// eliminated.
pub fn generate(session: &Session, result: Var) -> ShaderSources {
    let result_index = session.resolve(result);
    ShaderSources {
        vertex: vertex_source(),
        fragment: [
            preamble(),
            uniform_block(session),
            main_function(session, result_index),
        ]
        .join("\n"),
    }
}

fn preamble() -> String {
    "// imagecalc compute program\n".to_string()
}

fn uniform_block(session: &Session) -> String {
    let mut source = String::new();
    for variable in session.variables() {
        if let Origin::Texture(texture) = variable.origin {
            source.push_str(&format!(
                "uniform shader {};\n",
                session.textures()[texture].sampler_name
            ));
        }
    }
    source
}

fn main_function(session: &Session, result_index: usize) -> String {
    let variables = session.variables();
    let mut lines = vec![
        "half4 main(float2 coord) {".to_string(),
        format!("{}float2 uv = vertex_uv(coord);", INDENT),
    ];

    for variable in variables {
        let declaration = match &variable.origin {
            Origin::Texture(texture) => format!(
                "float4 {} = float4({}.eval(uv));",
                variable.name,
                session.textures()[*texture].sampler_name
            ),
            Origin::Operation(operation) => operation.statement(variable, variables),
            Origin::Channels(channels) => format!(
                "float4 {} = float4({}, {}, {}, {});",
                variable.name,
                variables[channels[0]].name,
                variables[channels[1]].name,
                variables[channels[2]].name,
                variables[channels[3]].name
            ),
            Origin::Literal => continue,
        };
        lines.push(format!("{}{}", INDENT, declaration));
    }

    let result = &variables[result_index];
    let output = match result.value_type {
        ValueType::Vector4 => result.name.clone(),
        ValueType::Scalar => broadcast(&result.name),
    };
    lines.push(format!("{}return half4({});", INDENT, output));
    lines.push("}".to_string());
    lines.join("\n") + "\n"
}
