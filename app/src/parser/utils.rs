/*******************************************************************************
*   (c) 2024 Zondax AG
*
*  Licensed under the Apache License, Version 2.0 (the "License");
*  you may not use this file except in compliance with the License.
*  You may obtain a copy of the License at
*
*      http://www.apache.org/licenses/LICENSE-2.0
*
*  Unless required by applicable law or agreed to in writing, software
*  distributed under the License is distributed on an "AS IS" BASIS,
*  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
*  See the License for the specific language governing permissions and
*  limitations under the License.
********************************************************************************/
use crate::constants::U64_SIZE;
use crate::parser::ParserError;
use crate::utils::rs_strlen;

/// Interprets up to 8 big-endian bytes as an unsigned 64-bit integer.
/// An empty slice decodes to zero
pub fn be_bytes_to_u64(bytes: &[u8]) -> Result<u64, ParserError> {
    if bytes.len() > U64_SIZE {
        return Err(ParserError::UnexpectedError);
    }

    let mut array = [0; U64_SIZE];
    array[U64_SIZE - bytes.len()..].copy_from_slice(bytes);

    Ok(u64::from_be_bytes(array))
}

#[inline(never)]
/// Converts an integer number string
/// to a fixed point number string, in place
///
/// The input is the null-padded ascii digits; the output subslice
/// has the decimal point inserted so that the last `decimals`
/// digits become the fractional part
pub fn intstr_to_fpstr_inplace(
    s: &mut [u8],
    decimals: usize,
) -> Result<&mut [u8], ParserError> {
    let mut num_chars = rs_strlen(s);

    // we need spare room for the padding and the decimal point
    if num_chars == s.len() {
        return Err(ParserError::UnexpectedBufferEnd);
    }

    if s.is_empty() {
        return Err(ParserError::UnexpectedBufferEnd);
    }

    //empty input string
    // let's just write a 0
    if num_chars == 0 {
        s[0] = b'0';
        num_chars = 1;
    }

    let mut first_digit_idx = None;
    for (i, c) in s[..num_chars].iter().enumerate() {
        if !c.is_ascii_digit() {
            return Err(ParserError::UnexpectedValue);
        }

        //just find the first significant digit
        if *c != b'0' {
            first_digit_idx = Some(i);
            break;
        }
    }

    // every digit past the first significant one was validated above,
    // check the rest of the string too
    if s[..num_chars].iter().any(|c| !c.is_ascii_digit()) {
        return Err(ParserError::UnexpectedValue);
    }

    //trim leading zeroes
    if let Some(idx) = first_digit_idx {
        s.copy_within(idx.., 0);
        s[num_chars - idx..].fill(0);
        num_chars -= idx;
    } else {
        //all zeroes, keep just one
        s[1..].fill(0);
        num_chars = 1;
    }

    if decimals == 0 {
        return Ok(&mut s[..num_chars]);
    }

    // Now insert decimal point

    //        0123456789012     <-decimal places
    //        abcd              < numChars = 4
    //                 abcd     < shift
    //        000000000abcd     < fill
    //        0.00000000abcd    < add decimal point

    if num_chars < decimals + 1 {
        let padding = decimals - num_chars + 1;
        if num_chars + padding + 1 > s.len() {
            return Err(ParserError::UnexpectedBufferEnd);
        }

        s.copy_within(..num_chars, padding);
        s[..padding].fill(b'0');
        num_chars += padding;
    }

    if num_chars + 1 > s.len() {
        return Err(ParserError::UnexpectedBufferEnd);
    }

    let point_position = num_chars - decimals;
    //shift the fractional digits one place to the right
    // and drop the point in the gap
    s.copy_within(point_position..num_chars, point_position + 1);
    s[point_position] = b'.';
    num_chars += 1;

    Ok(&mut s[..num_chars])
}
