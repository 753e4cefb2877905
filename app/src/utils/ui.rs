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

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
#[repr(u8)]
pub enum ViewError {
    Unknown,
    NoData,
    Reject,
}

/// Paginates `item` into `out`, writing only page `page`.
///
/// The page width is the output size minus the null terminator,
/// so every render target defines its own pagination. Returns the
/// total page count, or an error when `page` is past the last one.
#[inline(never)]
pub fn handle_ui_message(item: &[u8], out: &mut [u8], page: u8) -> Result<u8, ViewError> {
    crate::zlog("handle_ui_message\x00");

    let page_len = out.len().checked_sub(1).ok_or(ViewError::Unknown)?;
    if page_len == 0 {
        return Err(ViewError::Unknown);
    }

    if item.len() <= page_len {
        if page > 0 {
            return Err(ViewError::NoData);
        }

        out[..item.len()].copy_from_slice(item);
        out[item.len()] = 0;
        return Ok(1);
    }

    let pages = item.len().div_ceil(page_len);
    if pages > u8::MAX as usize {
        return Err(ViewError::Unknown);
    }

    let chunk = item
        .chunks(page_len)
        .nth(page as usize)
        .ok_or(ViewError::NoData)?;

    out[..chunk.len()].copy_from_slice(chunk);
    out[chunk.len()] = 0;

    Ok(pages as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page() {
        let mut out = [0u8; 10];
        let pages = handle_ui_message(b"short", &mut out, 0).unwrap();
        assert_eq!(pages, 1);
        assert_eq!(&out[..6], b"short\x00");
    }

    #[test]
    fn multiple_pages() {
        let mut out = [0u8; 5];
        // page width 4
        let pages = handle_ui_message(b"0123456789", &mut out, 0).unwrap();
        assert_eq!(pages, 3);
        assert_eq!(&out[..5], b"0123\x00");

        handle_ui_message(b"0123456789", &mut out, 1).unwrap();
        assert_eq!(&out[..5], b"4567\x00");

        handle_ui_message(b"0123456789", &mut out, 2).unwrap();
        assert_eq!(&out[..3], b"89\x00");
    }

    #[test]
    fn page_out_of_range() {
        let mut out = [0u8; 5];
        assert_eq!(
            handle_ui_message(b"0123456789", &mut out, 3),
            Err(ViewError::NoData)
        );
        assert_eq!(handle_ui_message(b"ok", &mut out, 1), Err(ViewError::NoData));
    }
}
