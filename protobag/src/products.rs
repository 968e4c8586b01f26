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

#[cfg(test)]
mod tests;

/// Enumerates the Cartesian product of index positions over a set of
/// pools, like `itertools.product()` over ranges.
///
/// Each item is one index per pool; the first pool varies fastest. An
/// empty pool (or an empty set of pools) yields nothing.
#[derive(Debug)]
pub struct IterProducts {
    pool_sizes: Vec<usize>,
    current: Option<Vec<usize>>,
    done: bool,
}

impl IterProducts {
    /// Creates an enumerator over pools of the given sizes.
    pub fn new(pool_sizes: Vec<usize>) -> IterProducts {
        IterProducts {
            pool_sizes,
            current: None,
            done: false,
        }
    }
}

impl Iterator for IterProducts {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }

        if self.pool_sizes.is_empty() || self.pool_sizes.iter().any(|&size| size == 0) {
            self.done = true;
            return None;
        }

        match self.current.take() {
            None => {
                let first = vec![0; self.pool_sizes.len()];

                self.current = Some(first.clone());
                Some(first)
            }
            Some(mut indices) => {
                // Odometer increment: bump the first pool, carrying into
                // the next on wrap-around.
                let mut carry = true;

                for (index, &size) in indices.iter_mut().zip(self.pool_sizes.iter()) {
                    *index += 1;

                    if *index == size {
                        *index = 0;
                    } else {
                        carry = false;
                        break;
                    }
                }

                if carry {
                    self.done = true;
                    return None;
                }

                self.current = Some(indices.clone());
                Some(indices)
            }
        }
    }
}
