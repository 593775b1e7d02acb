/// Container runtime log encodings

pub mod cri;
pub mod docker_json;

pub use cri::CriParser;
pub use docker_json::DockerJsonParser;
