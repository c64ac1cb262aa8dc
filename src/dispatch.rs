// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 请求分发模块
//!
//! 根据请求方法选择处理器并生成响应。分发器是错误的边界：
//! 处理器返回的任何 `Exception` 都在这里被记录并转换为 `500 Internal Server Error`，
//! 内部细节不会暴露给客户端。

use crate::{
    exception::Exception,
    param::{HttpRequestMethod, DEFAULT_MIME},
    request::Request,
    response::Response,
    util::{escapes_root, guess_content_type, normalize_path, HtmlBuilder},
};

use log::{debug, error, warn};
use std::{
    io,
    path::{Path, PathBuf},
};

/// GET 处理器读取静态文件所依赖的文件系统能力。
///
/// 路径均为相对于服务根目录、已经规范化的路径。
#[cfg_attr(test, mockall::automock)]
pub trait FileSource {
    /// 路径是否指向一个存在的普通文件
    fn is_file(&self, relative: &str) -> bool;
    /// 读取文件的全部内容
    fn read(&self, relative: &str) -> io::Result<Vec<u8>>;
}

/// 基于本地文件系统的 `FileSource`，以 `root` 作为服务根目录。
#[derive(Debug, Clone)]
pub struct LocalFiles {
    root: PathBuf,
}

impl LocalFiles {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSource for LocalFiles {
    fn is_file(&self, relative: &str) -> bool {
        self.root.join(relative).is_file()
    }

    fn read(&self, relative: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(relative))
    }
}

pub struct Dispatcher<F: FileSource = LocalFiles> {
    files: F,
}

impl<F: FileSource> Dispatcher<F> {
    pub fn new(files: F) -> Self {
        Self { files }
    }

    /// 为一个请求生成响应，永远不会失败。
    ///
    /// 1. 畸形请求直接返回 400，不进入方法查找。
    /// 2. 不在允许列表中的方法返回 405，并携带 `Allow` 头。
    /// 3. 处理器返回错误时记录日志并返回 500。
    pub fn dispatch(&self, request: &Request, id: u128) -> Response {
        if request.is_malformed() {
            warn!("[ID{}]请求格式不正确，返回400", id);
            return Response::response_400();
        }

        let method = match HttpRequestMethod::from_token(request.method()) {
            Some(m) => m,
            None => {
                warn!("[ID{}]不支持的HTTP请求方法：{}，返回405", id, request.method());
                return Response::response_405();
            }
        };

        let result = match method {
            HttpRequestMethod::Get => self.handle_get(request, id),
            HttpRequestMethod::Post => handle_post(request, id),
            HttpRequestMethod::Put => handle_put(request, id),
            HttpRequestMethod::Delete => handle_delete(request, id),
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                error!("[ID{}]处理{}请求时发生异常：{}", id, method, e);
                Response::response_500()
            }
        }
    }

    fn handle_get(&self, request: &Request, id: u128) -> Result<Response, Exception> {
        let filename = normalize_path(request.uri().trim_matches('/'));

        if escapes_root(&filename) {
            warn!("[ID{}]请求的路径：{} 越出了服务根目录，返回403", id, request.uri());
            return Ok(Response::response_403());
        }

        if !self.files.is_file(&filename) {
            warn!("[ID{}]请求的路径：{} 不存在，返回404", id, request.uri());
            return Ok(Response::response_404());
        }

        let contents = self.files.read(&filename).map_err(|e| {
            error!("[ID{}]无法读取文件{}。错误：{}", id, filename, e);
            Exception::FileReadFailed
        })?;

        let mime = guess_content_type(&filename).unwrap_or(DEFAULT_MIME);
        debug!("[ID{}]文件{}，MIME类型: {}，大小: {} bytes", id, filename, mime, contents.len());

        let mut response = Response::new();
        response
            .set_code(200)
            .set_header("Content-Type", mime)
            .set_content(contents);
        Ok(response)
    }
}

fn handle_post(request: &Request, id: u128) -> Result<Response, Exception> {
    if request.header("content-length").is_none() {
        warn!("[ID{}]POST请求缺少Content-Length，返回400", id);
        return Ok(Response::response_400());
    }

    let body = HtmlBuilder::new()
        .heading("POST Request Received")
        .paragraph(&format!("URI: {}", request.uri()))
        .paragraph(&format!("Content-Length: {}", request.body().len()))
        .paragraph("Body:")
        .preformatted(request.body())
        .build();

    Ok(html_response(body))
}

fn handle_put(request: &Request, id: u128) -> Result<Response, Exception> {
    if request.header("content-length").is_none() {
        warn!("[ID{}]PUT请求缺少Content-Length，返回400", id);
        return Ok(Response::response_400());
    }

    let body = HtmlBuilder::new()
        .heading("PUT Request Received")
        .paragraph(&format!("URI: {}", request.uri()))
        .paragraph(&format!("Content-Length: {}", request.body().len()))
        .build();

    Ok(html_response(body))
}

fn handle_delete(request: &Request, _id: u128) -> Result<Response, Exception> {
    let body = HtmlBuilder::new()
        .heading("DELETE Request Received")
        .paragraph(&format!("URI: {}", request.uri()))
        .build();

    Ok(html_response(body))
}

fn html_response(body: Vec<u8>) -> Response {
    let mut response = Response::new();
    response
        .set_code(200)
        .set_header("Content-Type", "text/html")
        .set_content(body);
    response
}
