// MIT License
//
// Copyright (c) 2024 The protobag developers
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

use super::IterProducts;

#[test]
fn enumerates_the_full_product() {
    let products: Vec<Vec<usize>> = IterProducts::new(vec![2, 3]).collect();

    assert_eq!(
        products,
        [
            vec![0, 0],
            vec![1, 0],
            vec![0, 1],
            vec![1, 1],
            vec![0, 2],
            vec![1, 2],
        ]
    );
}

#[test]
fn single_pool() {
    let products: Vec<Vec<usize>> = IterProducts::new(vec![3]).collect();

    assert_eq!(products, [vec![0], vec![1], vec![2]]);
}

#[test]
fn an_empty_pool_is_terminal() {
    assert_eq!(IterProducts::new(vec![2, 0, 3]).next(), None);
}

#[test]
fn no_pools_yield_nothing() {
    assert_eq!(IterProducts::new(vec![]).next(), None);
}

#[test]
fn exhausted_iterator_stays_exhausted() {
    let mut products = IterProducts::new(vec![1]);

    assert_eq!(products.next(), Some(vec![0]));
    assert_eq!(products.next(), None);
    assert_eq!(products.next(), None);
}
