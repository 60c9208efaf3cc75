use crate::{
    error::{DemoError, Result},
    image::Image,
};
use fxhash::FxHashMap;
use gl::types::{GLboolean, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use nalgebra_glm::{Mat4, Vec3};
use std::{
    cell::RefCell,
    ffi::{c_void, CString},
    fs,
    mem::size_of,
    path::Path,
};

pub struct ShaderProgram {
    id: GLuint,
    uniforms: RefCell<FxHashMap<String, GLint>>,
}

impl ShaderProgram {
    pub fn new() -> Option<Self> {
        let id = unsafe { gl::CreateProgram() };
        if id != 0 {
            Some(Self {
                id,
                uniforms: Default::default(),
            })
        } else {
            None
        }
    }

    /// Location of a uniform, cached after the first lookup. Unknown names
    /// resolve to -1, which OpenGL silently ignores.
    pub fn get_uniform(&self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.borrow().get(name) {
            return *location;
        }
        let location = match CString::new(name) {
            Ok(c_name) => unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr().cast()) },
            Err(_) => -1,
        };
        if location == -1 {
            log::warn!("Uniform {} not found in program {}", name, self.id);
        }
        self.uniforms.borrow_mut().insert(name.to_string(), location);
        location
    }

    pub fn attach_shader(&self, shader: &Shader) {
        unsafe { gl::AttachShader(self.id, shader.get_id()) };
    }

    pub fn link(&self) {
        unsafe { gl::LinkProgram(self.id) };
    }

    pub fn link_success(&self) -> bool {
        self.status(gl::LINK_STATUS)
    }

    pub fn validate(&self) {
        unsafe { gl::ValidateProgram(self.id) };
    }

    pub fn validate_success(&self) -> bool {
        self.status(gl::VALIDATE_STATUS)
    }

    fn status(&self, pname: GLenum) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(self.id, pname, &mut success) };
        success == i32::from(gl::TRUE)
    }

    pub fn info_log(&self) -> String {
        let mut needed_len = 0;
        unsafe { gl::GetProgramiv(self.id, gl::INFO_LOG_LENGTH, &mut needed_len) };
        let mut v: Vec<u8> = Vec::with_capacity(needed_len.max(0) as usize);
        let mut len_written = 0_i32;
        unsafe {
            gl::GetProgramInfoLog(
                self.id,
                v.capacity() as GLsizei,
                &mut len_written,
                v.as_mut_ptr().cast(),
            );
            v.set_len(len_written.max(0) as usize);
        }
        String::from_utf8_lossy(&v).into_owned()
    }

    pub fn use_(&self) {
        unsafe { gl::UseProgram(self.id) };
    }

    pub fn unuse() {
        unsafe {
            gl::UseProgram(0);
        }
    }

    /// Compiles both stages, links and validates them into a program.
    /// Compile and link failures are errors; a failed validation is only
    /// reported.
    pub fn from_vert_frag(vert: &str, frag: &str) -> Result<Self> {
        let p = Self::new().ok_or(DemoError::Allocation("a shader program"))?;
        let v = Shader::from_source(gl::VERTEX_SHADER, vert)?;
        let f = Shader::from_source(gl::FRAGMENT_SHADER, frag)?;
        p.attach_shader(&v);
        p.attach_shader(&f);
        p.link();
        drop(v);
        drop(f);
        if !p.link_success() {
            let log = p.info_log();
            log::error!("Failed to link shader program! ({})", log.trim_end());
            return Err(DemoError::ProgramLink(log));
        }
        p.validate();
        if !p.validate_success() {
            let err = DemoError::ProgramValidation(p.info_log().trim_end().to_string());
            log::error!("{err}");
        }
        Ok(p)
    }

    pub fn from_files(vert_path: impl AsRef<Path>, frag_path: impl AsRef<Path>) -> Result<Self> {
        let vert = read_source(vert_path.as_ref())?;
        let frag = read_source(frag_path.as_ref())?;
        let program = Self::from_vert_frag(&vert, &frag)?;
        log::debug!(
            "Built shader program {} from {} + {}",
            program.id,
            vert_path.as_ref().display(),
            frag_path.as_ref().display()
        );
        Ok(program)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| DemoError::io(path, err))
}

pub struct Shader {
    id: GLuint,
}

impl Shader {
    pub fn new(type_: GLenum) -> Option<Self> {
        let id = unsafe { gl::CreateShader(type_) };
        if id != 0 {
            Some(Self { id })
        } else {
            None
        }
    }

    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn set_source(&self, src: &str) {
        unsafe {
            gl::ShaderSource(
                self.id,
                1,
                &(src.as_bytes().as_ptr().cast()),
                &(src.len() as GLint),
            );
        }
    }

    pub fn compile(&self) {
        unsafe { gl::CompileShader(self.id) };
    }

    pub fn compile_success(&self) -> bool {
        let mut compiled = 0;
        unsafe { gl::GetShaderiv(self.id, gl::COMPILE_STATUS, &mut compiled) };
        compiled == i32::from(gl::TRUE)
    }

    pub fn info_log(&self) -> String {
        let mut needed_len = 0;
        unsafe { gl::GetShaderiv(self.id, gl::INFO_LOG_LENGTH, &mut needed_len) };
        let mut v: Vec<u8> = Vec::with_capacity(needed_len.max(0) as usize);
        let mut len_written = 0_i32;
        unsafe {
            gl::GetShaderInfoLog(
                self.id,
                v.capacity() as GLsizei,
                &mut len_written,
                v.as_mut_ptr().cast(),
            );
            v.set_len(len_written.max(0) as usize);
        }
        String::from_utf8_lossy(&v).into_owned()
    }

    pub fn from_source(type_: GLenum, source: &str) -> Result<Self> {
        let stage = stage_name(type_);
        let shader = Self::new(type_).ok_or(DemoError::Allocation("a shader"))?;
        shader.set_source(source);
        shader.compile();
        if shader.compile_success() {
            Ok(shader)
        } else {
            let log = shader.info_log();
            log::error!("Failed to compile {} shader! ({})", stage, log.trim_end());
            Err(DemoError::ShaderCompile { stage, log })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) };
    }
}

fn stage_name(type_: GLenum) -> &'static str {
    match type_ {
        gl::VERTEX_SHADER => "Vertex",
        gl::FRAGMENT_SHADER => "Fragment",
        gl::GEOMETRY_SHADER => "Geometry",
        _ => "Unknown",
    }
}

pub struct Texture {
    id: GLuint,
    target: GLenum,
}

impl Texture {
    pub fn new(target: GLenum) -> Option<Self> {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        if id != 0 {
            Some(Self { id, target })
        } else {
            None
        }
    }

    /// Loads an image into a repeating, mipmapped 2D texture. Magnification
    /// is nearest-neighbour to keep pixel art crisp.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let image = Image::load(path, true)?;
        let texture = Self::new(gl::TEXTURE_2D).ok_or(DemoError::Allocation("a texture"))?;
        texture.bind();
        texture.parameter(gl::TEXTURE_WRAP_S, gl::REPEAT);
        texture.parameter(gl::TEXTURE_WRAP_T, gl::REPEAT);
        texture.parameter(gl::TEXTURE_MIN_FILTER, gl::LINEAR_MIPMAP_LINEAR);
        texture.parameter(gl::TEXTURE_MAG_FILTER, gl::NEAREST);

        let format = image.format.gl_format();
        unsafe {
            // rows of RGB images are not 4-byte aligned in general
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                texture.target,
                0,
                format as GLint,
                image.width as GLsizei,
                image.height as GLsizei,
                0,
                format,
                gl::UNSIGNED_BYTE,
                image.data.as_ptr().cast(),
            );
            gl::GenerateMipmap(texture.target);
        }
        Ok(texture)
    }

    pub fn bind(&self) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0);
            gl::BindTexture(self.target, self.id);
        }
    }

    pub fn parameter(&self, pname: GLenum, param: GLenum) {
        unsafe {
            gl::TexParameteri(self.target, pname, param as GLint);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

pub struct VertexArrayObject {
    id: GLuint,
}

impl VertexArrayObject {
    pub fn new() -> Option<Self> {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        if id != 0 {
            Some(Self { id })
        } else {
            None
        }
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id) }
    }

    pub fn unbind() {
        unsafe { gl::BindVertexArray(0) }
    }
}

impl Drop for VertexArrayObject {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.id);
        }
    }
}

pub struct BufferObject {
    id: GLuint,
    target: GLenum,
}

impl BufferObject {
    pub fn new(target: GLenum) -> Option<Self> {
        let mut id = 0;
        unsafe {
            gl::GenBuffers(1, &mut id);
        }
        if id != 0 {
            Some(Self { id, target })
        } else {
            None
        }
    }

    pub fn bind(&self) {
        unsafe { gl::BindBuffer(self.target, self.id) }
    }

    pub fn buffer_data(&self, size: usize, data: *const c_void, usage: GLenum) {
        unsafe {
            gl::BufferData(self.target, size as GLsizeiptr, data, usage);
        }
    }
}

impl Drop for BufferObject {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.id) }
    }
}

pub fn configure_attribute(
    index: GLuint,
    size: GLint,
    type_: GLenum,
    normalized: GLboolean,
    stride: usize,
    pointer: *const c_void,
) {
    unsafe {
        gl::VertexAttribPointer(index, size, type_, normalized, stride as GLsizei, pointer);
    }
}

pub fn enable_attribute(index: GLuint) {
    unsafe {
        gl::EnableVertexAttribArray(index);
    }
}

/// A vertex array object together with the buffer it reads from. Binding the
/// VAO restores the attribute layout, so drawing only needs this one bind.
///
/// Only interleaved `f32` vertex data is supported.
pub struct VertexArray {
    vao: VertexArrayObject,
    _vbo: BufferObject,
    count: usize,
}

impl VertexArray {
    pub fn new(vertices: &[f32], attribute_sizes: &[i32]) -> Result<Self> {
        let floats_per_vertex: usize = attribute_sizes.iter().map(|s| *s as usize).sum();
        let stride = floats_per_vertex * size_of::<f32>();

        let vbo = BufferObject::new(gl::ARRAY_BUFFER).ok_or(DemoError::Allocation("a buffer"))?;
        vbo.bind();
        vbo.buffer_data(
            vertices.len() * size_of::<f32>(),
            vertices.as_ptr().cast(),
            gl::STATIC_DRAW,
        );

        let vao = VertexArrayObject::new().ok_or(DemoError::Allocation("a vertex array"))?;
        vao.bind();

        let mut offset = 0;
        for (index, size) in attribute_sizes.iter().enumerate() {
            configure_attribute(
                index as GLuint,
                *size,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const c_void,
            );
            enable_attribute(index as GLuint);
            offset += *size as usize * size_of::<f32>();
        }
        VertexArrayObject::unbind();

        Ok(Self {
            vao,
            _vbo: vbo,
            count: vertices.len() / floats_per_vertex.max(1),
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

pub trait Bind {
    fn bind(&self);
}

impl Bind for Texture {
    fn bind(&self) {
        Texture::bind(self);
    }
}

impl Bind for ShaderProgram {
    fn bind(&self) {
        self.use_();
    }
}

impl Bind for VertexArray {
    fn bind(&self) {
        self.vao.bind();
    }
}

pub fn bind(resource: &impl Bind) {
    resource.bind();
}

pub trait Uniform {
    fn set(&self, location: GLint);
}

impl Uniform for i32 {
    fn set(&self, location: GLint) {
        unsafe { gl::Uniform1i(location, *self) }
    }
}

impl Uniform for f32 {
    fn set(&self, location: GLint) {
        unsafe { gl::Uniform1f(location, *self) }
    }
}

impl Uniform for Vec3 {
    fn set(&self, location: GLint) {
        unsafe { gl::Uniform3f(location, self.x, self.y, self.z) }
    }
}

impl Uniform for Mat4 {
    fn set(&self, location: GLint) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, self.as_ptr()) }
    }
}

/// Sets a uniform on `program`, which must be the program currently bound.
pub fn set_uniform(program: &ShaderProgram, name: &str, value: &impl Uniform) {
    value.set(program.get_uniform(name));
}

pub fn clear(r: f32, g: f32, b: f32, a: f32) {
    unsafe {
        gl::ClearColor(r, g, b, a);
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}

pub fn draw(vertex_array: &VertexArray) {
    unsafe { gl::DrawArrays(gl::TRIANGLES, 0, vertex_array.count() as GLsizei) }
}

pub fn viewport(width: i32, height: i32) {
    unsafe { gl::Viewport(0, 0, width, height) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_cover_program_stages() {
        assert_eq!(stage_name(gl::VERTEX_SHADER), "Vertex");
        assert_eq!(stage_name(gl::FRAGMENT_SHADER), "Fragment");
        assert_eq!(stage_name(0), "Unknown");
    }

    #[test]
    fn compile_error_names_the_stage() {
        let err = DemoError::ShaderCompile {
            stage: stage_name(gl::FRAGMENT_SHADER),
            log: "0:1: syntax error".to_string(),
        };
        assert_eq!(err.to_string(), "Fragment Compile Error: 0:1: syntax error");
    }

    #[test]
    fn validation_error_carries_the_log() {
        let err = DemoError::ProgramValidation("sampler mismatch".to_string());
        assert_eq!(err.to_string(), "Program Validation Error: sampler mismatch");
    }

    #[test]
    fn gl_objects_release_themselves_on_drop() {
        // an early `?` in from_vert_frag must not leak a compiled stage
        assert!(std::mem::needs_drop::<Shader>());
        assert!(std::mem::needs_drop::<ShaderProgram>());
        assert!(std::mem::needs_drop::<Texture>());
        assert!(std::mem::needs_drop::<VertexArray>());
    }

    #[test]
    fn missing_shader_source_is_io_error() {
        let err = read_source(Path::new("assets/shaders/missing.vert")).unwrap_err();
        assert!(matches!(err, DemoError::Io { .. }));
    }
}
