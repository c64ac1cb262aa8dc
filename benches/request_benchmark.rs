use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tinyhttpd::request::Request;

fn simple_request_parse_benchmark(c: &mut Criterion) {
    let request = b"GET / HTTP/1.1\r\nHost: localhost:8888\r\nUser-Agent: Test\r\n\r\n";

    c.bench_function("simple_request_parse", |b| {
        b.iter(|| {
            let request = Request::parse(black_box(request));
            assert!(!request.is_malformed());
        });
    });
}

fn complex_request_parse_benchmark(c: &mut Criterion) {
    let request = b"GET /path/to/resource?id=123&name=test HTTP/1.1\r\n\
                    Host: localhost:8888\r\n\
                    User-Agent: Mozilla/5.0 (Windows NT 10.0; Win64; x64)\r\n\
                    Accept: text/html,application/xhtml+xml\r\n\
                    Accept-Language: en-US,en;q=0.9\r\n\
                    Accept-Encoding: gzip, deflate, br\r\n\
                    Upgrade-Insecure-Requests: 1\r\n\
                    \r\n";

    c.bench_function("complex_request_parse", |b| {
        b.iter(|| Request::parse(black_box(request)));
    });
}

fn request_parse_body_size_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_parse_body_size");

    for size in [0usize, 1024, 64 * 1024, 1024 * 1024 - 128].iter() {
        let mut request = format!("POST /upload HTTP/1.1\r\nContent-Length: {}\r\n\r\n", size).into_bytes();
        request.resize(request.len() + size, b'x');
        group.bench_with_input(BenchmarkId::from_parameter(size), &request, |b, request| {
            b.iter(|| Request::parse(black_box(request)));
        });
    }

    group.finish();
}

fn request_parse_malformed_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_parse_malformed");

    let requests = [
        ("two_tokens", b"GET /\r\n\r\n".as_slice()),
        ("four_tokens", b"GET / HTTP/1.1 x\r\n\r\n".as_slice()),
        ("invalid_utf8", b"GET /\xff HTTP/1.1\r\n\r\n".as_slice()),
        ("no_terminator", b"GET / HTTP/1.1\r\nHost: localhost".as_slice()),
    ];

    for (name, request) in requests.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), request, |b, request| {
            b.iter(|| Request::parse(black_box(request)));
        });
    }

    group.finish();
}

fn request_case_insensitive_headers_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_case_insensitive");

    let requests = [
        ("lowercase", b"POST / HTTP/1.1\r\nhost: localhost\r\ncontent-length: 0\r\n\r\n".as_slice()),
        ("uppercase", b"POST / HTTP/1.1\r\nHOST: localhost\r\nCONTENT-LENGTH: 0\r\n\r\n".as_slice()),
        ("mixed", b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\n\r\n".as_slice()),
    ];

    for (name, request) in requests.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), request, |b, request| {
            b.iter(|| {
                let request = Request::parse(black_box(request));
                assert!(request.header("content-length").is_some());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    simple_request_parse_benchmark,
    complex_request_parse_benchmark,
    request_parse_body_size_benchmark,
    request_parse_malformed_benchmark,
    request_case_insensitive_headers_benchmark
);
criterion_main!(benches);
