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
use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(all(not(test), target_os = "none"))] {
        extern "C" {
            ///Link to the C user-preference storage
            fn app_mode_expert() -> u8;
        }

        /// Whether the user enabled reviewing of arbitrary contract calls
        pub fn is_expert_mode() -> bool {
            unsafe { app_mode_expert() != 0 }
        }
    } else {
        /// Provide a mock for host builds and tests
        static mut EXPERT_MODE: bool = false;

        pub fn is_expert_mode() -> bool {
            //safe: single-threaded
            unsafe { EXPERT_MODE }
        }

        pub fn set_expert_mode(enabled: bool) {
            unsafe { EXPERT_MODE = enabled }
        }
    }
}
